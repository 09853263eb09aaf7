//! Noyau de la calculatrice scientifique
//!
//! Organisation interne :
//! - jetons.rs    : tokenisation (texte -> jetons + positions)
//! - table.rs     : fonctions, constantes, alias
//! - normalise.rs : multiplication implicite, moins unaire, alias, têtes d’appel
//! - syntaxe.rs   : analyse Pratt stricte + souple (aperçu)
//! - expr.rs      : AST
//! - eval.rs      : évaluation f64 (erreurs de domaine)
//! - trig.rs      : mode d’angle + angles spéciaux
//! - lecture.rs   : arrondi d’affichage
//! - format.rs    : rendu LaTeX
//! - crochets.rs  : fermantes manquantes pendant la saisie
//! - apercu.rs    : aperçu “si on fermait la ligne”
//! - demarche.rs  : trace pas à pas

pub mod apercu;
pub mod crochets;
pub mod demarche;
pub mod erreurs;
pub mod eval;
pub mod expr;
pub mod format;
pub mod jetons;
pub mod lecture;
pub mod normalise;
pub mod syntaxe;
pub mod table;
pub mod trig;

#[cfg(test)]
mod tests_scientifiques;

#[cfg(test)]
mod tests_fuzz_safe;

// API publique
pub use apercu::{preview_evaluate, preview_evaluate_avec, Apercu};
pub use crochets::bracket_balance_suffix;
pub use demarche::{demarche, Demarche};
pub use erreurs::{ErreurAnalyse, ErreurCalc, ErreurDomaine, ErreurLexicale, ErreurSyntaxe, GenreSyntaxe};
pub use eval::{evaluate, evaluate_text, evaluate_text_avec};
pub use expr::Expr;
pub use format::{typeset, typeset_partial};
pub use jetons::{is_label_text, tokenize};
pub use normalise::normalize;
pub use syntaxe::{parse, parse_lenient, tokenize_and_parse, tokenize_and_parse_avec, Partiel};
pub use table::Table;
pub use trig::ModeAngle;
