// src/noyau/demarche.rs
//
// Démarche : trace pas à pas d’une évaluation stricte
// jetons -> jetons normalisés -> arbre -> rendu -> valeur

use tracing::debug;

use super::erreurs::ErreurCalc;
use super::eval::evaluate;
use super::format::typeset;
use super::jetons::{format_tokens, tokenize};
use super::lecture::formater_valeur;
use super::normalise::normalize;
use super::syntaxe::parse;
use super::trig::ModeAngle;
use crate::config::Config;

#[derive(Clone, Debug, PartialEq)]
pub struct Demarche {
    pub jetons: String,
    pub normalises: String,
    /// Lecture structurelle de l’arbre ("2 + (3 * 4)").
    pub arbre: String,
    pub rendu: String,
    pub valeur: f64,
    /// Valeur arrondie aux chiffres de la config.
    pub lecture: String,
    pub mode: ModeAngle,
}

pub fn demarche(texte: &str, config: &Config, mode: ModeAngle) -> Result<Demarche, ErreurCalc> {
    let jetons = tokenize(texte)?;
    let normalises = normalize(&jetons, &config.table);
    let arbre = parse(&normalises, &config.table)?;
    debug!(arbre = %arbre, "démarche : arbre");

    let valeur = evaluate(&arbre, mode)?;

    Ok(Demarche {
        jetons: format_tokens(&jetons),
        normalises: format_tokens(&normalises),
        arbre: arbre.to_string(),
        rendu: typeset(&arbre),
        valeur,
        lecture: formater_valeur(valeur, config.chiffres),
        mode,
    })
}
