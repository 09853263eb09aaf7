// src/noyau/crochets.rs
//
// Équilibre des parenthèses pendant la saisie.
// Travaille sur le texte brut (pas de jetons, pas d’arbre) : total, linéaire,
// sans canal d’erreur. Une fermante qui ne correspond pas au sommet est ignorée.

use super::jetons::Crochet;

/// Entrée de pile : une ouvrante encore ouverte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cadre {
    pub ouvrante: Crochet,
    pub position: usize, // indice de caractère
}

/// Pile des ouvrantes non fermées dans les `curseur` premiers caractères.
pub fn ouvrantes_restantes(texte: &str, curseur: usize) -> Vec<Cadre> {
    let mut pile: Vec<Cadre> = Vec::new();

    for (position, c) in texte.chars().take(curseur).enumerate() {
        if let Some(ouvrante) = Crochet::depuis_ouvrante(c) {
            pile.push(Cadre { ouvrante, position });
        } else if let Some(k) = Crochet::depuis_fermante(c) {
            if pile.last().is_some_and(|cadre| cadre.ouvrante == k) {
                pile.pop();
            }
        }
    }

    pile
}

/// Fermantes qui équilibrent le texte jusqu’au curseur, la plus interne d’abord.
/// "(a+(b*[c", 8 => "]))"
pub fn bracket_balance_suffix(texte: &str, curseur: usize) -> String {
    ouvrantes_restantes(texte, curseur)
        .iter()
        .rev()
        .map(|cadre| cadre.ouvrante.fermante())
        .collect()
}
