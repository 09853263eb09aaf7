// src/noyau/erreurs.rs
//
// Taxonomie des erreurs du noyau.
// - ErreurLexicale : jetons (caractère inconnu, nombre mal formé)
// - ErreurSyntaxe  : analyse stricte (genre + position source)
// - ErreurDomaine  : évaluation (jamais de NaN silencieux)
//
// Les positions sont des indices de caractères dans le texte d’entrée.

use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ErreurLexicale {
    #[error("caractère inattendu: '{caractere}' (position {position})")]
    CaractereInattendu { caractere: char, position: usize },

    #[error("nombre invalide: '{texte}' (position {position})")]
    NombreInvalide { texte: String, position: usize },
}

impl ErreurLexicale {
    pub fn position(&self) -> usize {
        match self {
            ErreurLexicale::CaractereInattendu { position, .. }
            | ErreurLexicale::NombreInvalide { position, .. } => *position,
        }
    }
}

/// Discriminant d’une erreur d’analyse.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenreSyntaxe {
    /// Opérateur final, virgule hors appel, deux valeurs collées…
    JetonInattendu,
    /// Fermante orpheline, fermante d’un autre type, ouvrante jamais fermée.
    ParentheseNonAppariee,
    FonctionInconnue,
    /// Nombre d’arguments hors de l’arité (dont `sin()`).
    AriteIncorrecte,
    /// Garde-fou de profondeur : plus de 128 niveaux d’imbrication.
    TropImbrique,
    /// Garde-fou de longueur : plus de 2048 noeuds, même sans imbrication.
    TropLong,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{message} (position {position})")]
pub struct ErreurSyntaxe {
    pub genre: GenreSyntaxe,
    pub position: usize,
    pub message: String,
}

impl ErreurSyntaxe {
    pub fn new(genre: GenreSyntaxe, position: usize, message: impl Into<String>) -> Self {
        Self {
            genre,
            position,
            message: message.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ErreurDomaine {
    #[error("division par zéro")]
    DivisionParZero,

    #[error("racine carrée d’un nombre négatif")]
    RacineNegative,

    #[error("hors domaine: {0}")]
    HorsDomaine(String),

    #[error("symbole inconnu: {0}")]
    SymboleInconnu(String),
}

impl ErreurDomaine {
    pub(crate) fn hors_domaine(msg: impl Into<String>) -> Self {
        ErreurDomaine::HorsDomaine(msg.into())
    }
}

/// Échec de `tokenize_and_parse` (mode strict).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ErreurAnalyse {
    #[error("erreur lexicale: {0}")]
    Lexicale(#[from] ErreurLexicale),

    #[error("erreur de syntaxe: {0}")]
    Syntaxe(#[from] ErreurSyntaxe),
}

impl ErreurAnalyse {
    pub fn position(&self) -> usize {
        match self {
            ErreurAnalyse::Lexicale(e) => e.position(),
            ErreurAnalyse::Syntaxe(e) => e.position,
        }
    }
}

/// Échec du pipeline complet (texte -> valeur).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ErreurCalc {
    #[error(transparent)]
    Analyse(#[from] ErreurAnalyse),

    #[error("erreur de calcul: {0}")]
    Domaine(#[from] ErreurDomaine),
}

impl From<ErreurLexicale> for ErreurCalc {
    fn from(e: ErreurLexicale) -> Self {
        ErreurCalc::Analyse(e.into())
    }
}

impl From<ErreurSyntaxe> for ErreurCalc {
    fn from(e: ErreurSyntaxe) -> Self {
        ErreurCalc::Analyse(e.into())
    }
}
