// src/noyau/apercu.rs
//
// Aperçu pendant la saisie : “que donnerait cette ligne si on la fermait ?”
//
// 1) vide / espaces         -> Vide
// 2) texte + fermantes manquantes -> analyse stricte -> évaluation
//    succès                 -> Complet("<rendu> = <valeur>")
// 3) tout échec             -> analyse souple du texte brut -> RenduSeul(rendu partiel)
//    (arbre vide            -> RenduSeul(texte brut))
//
// Les lignes étiquette sont évaluées comme le reste ("pi" -> \pi = 3.14…) :
// seule la session (app/vue.rs) les recopie telles quelles.
//
// Ne panique jamais, ne renvoie jamais d’erreur.

use tracing::debug;

use super::crochets::bracket_balance_suffix;
use super::eval::evaluate;
use super::format::{typeset, typeset_partial};
use super::lecture::formater_latex;
use super::syntaxe::{parse_lenient, tokenize_and_parse_avec};
use super::trig::ModeAngle;
use crate::config::Config;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Apercu {
    /// Rendu complet et valeur : "<rendu> = <valeur>".
    Complet(String),
    /// Rendu seul (saisie incomplète ou erreur de calcul).
    RenduSeul(String),
    Vide,
}

impl Apercu {
    pub fn balisage(&self) -> Option<&str> {
        match self {
            Apercu::Complet(s) | Apercu::RenduSeul(s) => Some(s),
            Apercu::Vide => None,
        }
    }
}

/// Aperçu avec la configuration par défaut.
pub fn preview_evaluate(texte_saisi: &str, mode: ModeAngle) -> Apercu {
    preview_evaluate_avec(texte_saisi, mode, &Config::default())
}

pub fn preview_evaluate_avec(texte_saisi: &str, mode: ModeAngle, config: &Config) -> Apercu {
    if texte_saisi.trim().is_empty() {
        return Apercu::Vide;
    }

    let n = texte_saisi.chars().count();
    let complet = format!("{texte_saisi}{}", bracket_balance_suffix(texte_saisi, n));

    let echec = match tokenize_and_parse_avec(&complet, &config.table) {
        Ok(arbre) => match evaluate(&arbre, mode) {
            Ok(v) => {
                return Apercu::Complet(format!(
                    "{} = {}",
                    typeset(&arbre),
                    formater_latex(v, config.chiffres)
                ))
            }
            Err(e) => e.to_string(),
        },
        Err(e) => e.to_string(),
    };
    debug!(texte = texte_saisi, %echec, "aperçu : repli sur le rendu partiel");

    let partiel = parse_lenient(texte_saisi, &config.table);
    if partiel.arbre.is_none() {
        return Apercu::RenduSeul(texte_saisi.to_string());
    }
    Apercu::RenduSeul(typeset_partial(&partiel))
}
