// src/app.rs
//
// Calculatrice scientifique : module App (racine)
// -----------------------------------------------
// Rôle:
// - Déclarer les sous-modules (etat.rs + vue.rs)
// - Ré-exporter AppCalc et Sortie (pour main.rs: use app::{AppCalc, Sortie};)
//
// etat.rs garde l’état de session sans rien afficher ; vue.rs lit les lignes,
// appelle le noyau et écrit les sorties.

pub mod etat;
pub mod vue;

pub use etat::AppCalc;
pub use vue::Sortie;
