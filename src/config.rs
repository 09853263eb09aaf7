// src/config.rs
//
// Réglages de la calculatrice (JSON). Chaque champ a une valeur par défaut :
// un fichier partiel, voire "{}", est une configuration valide.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::noyau::lecture::borner_chiffres;
use crate::noyau::table::Table;
use crate::noyau::trig::ModeAngle;

#[derive(Debug, Error)]
pub enum ErreurConfig {
    #[error("lecture de la configuration impossible: {0}")]
    Lecture(#[from] std::io::Error),

    #[error("configuration invalide: {0}")]
    Format(#[from] serde_json::Error),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Chiffres significatifs affichés (1..=17).
    #[serde(default = "default_chiffres")]
    pub chiffres: usize,

    #[serde(default)]
    pub mode_angle: ModeAngle,

    #[serde(default)]
    pub table: Table,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chiffres: default_chiffres(),
            mode_angle: ModeAngle::default(),
            table: Table::default(),
        }
    }
}

fn default_chiffres() -> usize {
    10
}

impl Config {
    pub fn depuis_json(json: &str) -> Result<Self, ErreurConfig> {
        let mut c: Config = serde_json::from_str(json)?;
        c.chiffres = borner_chiffres(c.chiffres);
        Ok(c)
    }

    pub fn depuis_fichier(chemin: impl AsRef<Path>) -> Result<Self, ErreurConfig> {
        let json = std::fs::read_to_string(chemin)?;
        Self::depuis_json(&json)
    }

    pub fn avec_chiffres(mut self, chiffres: usize) -> Self {
        self.chiffres = borner_chiffres(chiffres);
        self
    }

    pub fn avec_mode(mut self, mode: ModeAngle) -> Self {
        self.mode_angle = mode;
        self
    }
}
