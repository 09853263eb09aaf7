//! Calculatrice scientifique : noyau d’interprétation d’expressions.
//!
//! Une ligne de texte libre est découpée en jetons, normalisée (multiplication
//! implicite, moins unaire, alias), analysée (Pratt), puis :
//! - évaluée en f64 dans un mode d’angle (degrés ou radians),
//! - rendue en LaTeX (KaTeX),
//! - prévisualisée pendant la saisie (fermantes manquantes, rendu partiel).
//!
//! ```
//! use calculatrice_sci::{evaluate_text, preview_evaluate, Apercu, ModeAngle};
//!
//! assert_eq!(evaluate_text("2(3+4)", ModeAngle::Degres), Ok(14.0));
//! assert_eq!(
//!     preview_evaluate("sqrt(16", ModeAngle::Degres),
//!     Apercu::Complet("\\sqrt{16} = 4".into())
//! );
//! ```
//!
//! Toutes les fonctions du noyau sont pures : aucun état global, aucun verrou.

pub mod config;
pub mod noyau;

pub use config::{Config, ErreurConfig};
pub use noyau::*;
