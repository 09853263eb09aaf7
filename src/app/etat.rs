//! src/app/etat.rs
//!
//! État de session (sans affichage).
//!
//! Rôle : contenir l’état de la calculatrice (entrée, réponse, rendu, erreur, démarche,
//! réglages) et offrir des opérations simples (C/CLR/AC) sans logique de sortie.
//!
//! Contrats :
//! - Aucune écriture ici (ni stdout, ni stderr).
//! - Actions déterministes, sans effet de bord caché.
//! - Les chiffres affichés restent bornés (voir `lecture::borner_chiffres`).

use calculatrice_sci::{Config, Demarche, ModeAngle};

#[derive(Clone, Debug)]
pub struct AppCalc {
    // --- réglages ---
    pub config: Config,

    // --- entrée utilisateur ---
    pub entree: String,

    // --- sorties ---
    pub reponse: String, // valeur lue (ou étiquette recopiée)
    pub rendu: String,   // balisage LaTeX
    pub erreur: String,  // message d’erreur (si analyse/évaluation échoue)

    // --- démarche (sortie "complet") ---
    pub demarche: Option<Demarche>,
}

impl AppCalc {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            entree: String::new(),
            reponse: String::new(),
            rendu: String::new(),
            erreur: String::new(),
            demarche: None,
        }
    }

    pub fn mode(&self) -> ModeAngle {
        self.config.mode_angle
    }

    /* ------------------------ Actions (état seulement) ------------------------ */

    /// AC : remise à zéro totale (entrée + résultats + chiffres par défaut).
    pub fn reset_total(&mut self) {
        self.entree.clear();
        self.clear_resultats();
        self.config = self.config.clone().avec_chiffres(Config::default().chiffres);
    }

    /// C : effacer seulement l’entrée.
    pub fn clear_entree(&mut self) {
        self.entree.clear();
    }

    /// CLR : effacer résultats + erreur + démarche (sans toucher à l’entrée).
    pub fn clear_resultats(&mut self) {
        self.reponse.clear();
        self.rendu.clear();
        self.erreur.clear();
        self.demarche = None;
    }

    /// Une faute efface la réponse et la démarche : elles ne décrivent plus l’entrée.
    pub fn set_erreur(&mut self, msg: impl Into<String>) {
        self.clear_resultats();
        self.erreur = msg.into();
    }

    /// Dépose un résultat complet (réponse lue + rendu + démarche).
    pub fn set_resultats(&mut self, demarche: Demarche) {
        self.erreur.clear();
        self.reponse = demarche.lecture.clone();
        self.rendu = demarche.rendu.clone();
        self.demarche = Some(demarche);
    }

    /// Ligne étiquette : recopiée telle quelle, jamais évaluée.
    pub fn set_etiquette(&mut self, texte: impl Into<String>, rendu: impl Into<String>) {
        self.clear_resultats();
        self.reponse = texte.into();
        self.rendu = rendu.into();
    }

    pub fn set_chiffres(&mut self, chiffres: usize) {
        self.config = self.config.clone().avec_chiffres(chiffres);
    }

    pub fn set_mode(&mut self, mode: ModeAngle) {
        self.config = self.config.clone().avec_mode(mode);
    }
}
