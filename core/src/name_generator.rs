//! Deterministic client and studio name generation for synthetic tenants.
//!
//! Same RNG seed = same names.

use crate::rng::StreamRng;

pub struct NameGenerator;

impl NameGenerator {
    /// Full client name (first + last).
    pub fn generate_full_name(rng: &mut StreamRng) -> String {
        let first = rng.pick(Self::first_names());
        let last = rng.pick(Self::last_names());
        format!("{first} {last}")
    }

    /// Studio name: "<Prefix> <Noun> <Suffix>" or "<LastName> <Noun> <Suffix>".
    pub fn generate_studio_name(rng: &mut StreamRng) -> String {
        let noun = *rng.pick(Self::studio_nouns());
        let suffix = *rng.pick(Self::studio_suffixes());
        if rng.chance(0.5) {
            format!("{} {noun} {suffix}", rng.pick(Self::studio_prefixes()))
        } else {
            format!("{} {noun} {suffix}", rng.pick(Self::last_names()))
        }
    }

    fn first_names() -> &'static [&'static str] {
        &[
            "Ana", "Beatriz", "Bruna", "Camila", "Carla", "Fernanda", "Gabriela",
            "Isabela", "Juliana", "Larissa", "Leticia", "Mariana", "Natalia", "Patricia",
            "Rafaela", "Sofia", "Vitoria", "Yasmin", "Amanda", "Helena",
            "Andre", "Bruno", "Caio", "Daniel", "Diego", "Eduardo", "Felipe",
            "Gabriel", "Gustavo", "Henrique", "Igor", "Joao", "Lucas", "Marcelo",
            "Matheus", "Pedro", "Rafael", "Rodrigo", "Thiago", "Vinicius",
        ]
    }

    fn last_names() -> &'static [&'static str] {
        &[
            "Silva", "Santos", "Oliveira", "Souza", "Rodrigues", "Ferreira", "Alves",
            "Pereira", "Lima", "Gomes", "Costa", "Ribeiro", "Martins", "Carvalho",
            "Almeida", "Lopes", "Soares", "Fernandes", "Vieira", "Barbosa",
            "Rocha", "Dias", "Nascimento", "Andrade", "Moreira", "Nunes", "Marques",
            "Machado", "Mendes", "Freitas", "Cardoso", "Ramos", "Goncalves", "Santana",
        ]
    }

    fn studio_prefixes() -> &'static [&'static str] {
        &[
            "Black", "Red", "Golden", "Iron", "Sacred", "Electric", "Wild", "Old School",
            "Neon", "Silver", "Crimson", "Midnight",
        ]
    }

    fn studio_nouns() -> &'static [&'static str] {
        &["Needle", "Ink", "Rose", "Dagger", "Lotus", "Anchor", "Serpent", "Skull", "Tinta"]
    }

    fn studio_suffixes() -> &'static [&'static str] {
        &["Tattoo", "Studio", "Tattoo Studio", "Ink Co.", "Parlour", "Atelier"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{RngBank, StreamSlot};

    #[test]
    fn names_are_deterministic() {
        let mut a = RngBank::new(99).for_slot(StreamSlot::Clients);
        let mut b = RngBank::new(99).for_slot(StreamSlot::Clients);
        assert_eq!(
            NameGenerator::generate_full_name(&mut a),
            NameGenerator::generate_full_name(&mut b)
        );
    }
}
