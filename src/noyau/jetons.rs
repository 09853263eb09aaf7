// src/noyau/jetons.rs

use std::fmt;

use super::erreurs::ErreurLexicale;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    Plus,
    Moins,
    Fois,
    FoisImplicite, // inséré par normalise.rs : 2x, 2(3), )(
    Divise,
    Puissance, // ^
    Neg,       // moins unaire (décidé par normalise.rs)
    Factorielle,
    Pourcent,
}

impl Op {
    pub fn symbole(self) -> &'static str {
        match self {
            Op::Plus => "+",
            Op::Moins => "-",
            Op::Fois => "*",
            Op::FoisImplicite => "·",
            Op::Divise => "/",
            Op::Puissance => "^",
            Op::Neg => "neg",
            Op::Factorielle => "!",
            Op::Pourcent => "%",
        }
    }

    /// Opérateur postfixé (s’applique à la valeur de gauche).
    pub fn est_postfixe(self) -> bool {
        matches!(self, Op::Factorielle | Op::Pourcent)
    }
}

/// Famille de parenthèses : ( ) [ ] { }
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Crochet {
    Rond,
    Carre,
    Accolade,
}

impl Crochet {
    pub fn depuis_ouvrante(c: char) -> Option<Crochet> {
        match c {
            '(' => Some(Crochet::Rond),
            '[' => Some(Crochet::Carre),
            '{' => Some(Crochet::Accolade),
            _ => None,
        }
    }

    pub fn depuis_fermante(c: char) -> Option<Crochet> {
        match c {
            ')' => Some(Crochet::Rond),
            ']' => Some(Crochet::Carre),
            '}' => Some(Crochet::Accolade),
            _ => None,
        }
    }

    pub fn ouvrante(self) -> char {
        match self {
            Crochet::Rond => '(',
            Crochet::Carre => '[',
            Crochet::Accolade => '{',
        }
    }

    pub fn fermante(self) -> char {
        match self {
            Crochet::Rond => ')',
            Crochet::Carre => ']',
            Crochet::Accolade => '}',
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Tok {
    Nombre(f64),

    // Tout mot qui n’est ni nombre ni opérateur ; normalise.rs décidera
    // s’il s’agit d’une fonction (Tok::Fonction), d’une constante ou d’une variable.
    Ident(String),

    // Tête d’appel (produite par normalise.rs uniquement)
    Fonction(String),

    Op(Op),

    Ouvrante(Crochet),
    Fermante(Crochet),
    Virgule,

    Fin,
}

/// Intervalle source [debut, fin) en indices de caractères.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Span {
    pub debut: usize,
    pub fin: usize,
}

impl Span {
    pub fn new(debut: usize, fin: usize) -> Self {
        Self { debut, fin }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Jeton {
    pub tok: Tok,
    pub span: Span,
}

impl Jeton {
    pub fn new(tok: Tok, debut: usize, fin: usize) -> Self {
        Self {
            tok,
            span: Span::new(debut, fin),
        }
    }
}

impl fmt::Display for Tok {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tok::Nombre(v) => write!(f, "{v}"),
            Tok::Ident(nom) | Tok::Fonction(nom) => f.write_str(nom),
            Tok::Op(op) => f.write_str(op.symbole()),
            Tok::Ouvrante(c) => write!(f, "{}", c.ouvrante()),
            Tok::Fermante(c) => write!(f, "{}", c.fermante()),
            Tok::Virgule => f.write_str(","),
            Tok::Fin => f.write_str("⊣"),
        }
    }
}

/// Tokenize une chaîne en jetons (toujours terminée par Tok::Fin).
/// Supporte:
/// - nombres décimaux (12, 0.5, .5) et notation scientifique (2e3, 1.5E-2)
/// - opérateurs + - * / ^ ! % et leurs variantes × · ∗ ∙ ÷ ∕ ⁄ −
/// - exposants ⁰..⁹ (=> ^n), touche EE (2EE3 = 2000)
/// - parenthèses ( ) [ ] { } et virgule
/// - identifiants (lettres, '_'), avec suffixe ⁻¹ ou indice ₀..₉ collé (sin⁻¹, log₂)
/// - π, √, ∛, ∜ (identifiants d’un caractère, résolus par la table)
pub fn tokenize(s: &str) -> Result<Vec<Jeton>, ErreurLexicale> {
    let mut out = Vec::new();
    let chars: Vec<char> = s.chars().collect();
    let mut i: usize = 0;

    while i < chars.len() {
        let c = chars[i];

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        // Parenthèses + virgule
        if let Some(k) = Crochet::depuis_ouvrante(c) {
            out.push(Jeton::new(Tok::Ouvrante(k), i, i + 1));
            i += 1;
            continue;
        }
        if let Some(k) = Crochet::depuis_fermante(c) {
            out.push(Jeton::new(Tok::Fermante(k), i, i + 1));
            i += 1;
            continue;
        }
        if c == ',' {
            out.push(Jeton::new(Tok::Virgule, i, i + 1));
            i += 1;
            continue;
        }

        // Opérateurs
        let op = match c {
            '+' => Some(Op::Plus),
            '-' | '−' => Some(Op::Moins),
            '*' | '×' | '·' | '∗' | '∙' => Some(Op::Fois),
            '/' | '÷' | '∕' | '⁄' => Some(Op::Divise),
            '^' => Some(Op::Puissance),
            '!' => Some(Op::Factorielle),
            '%' => Some(Op::Pourcent),
            _ => None,
        };
        if let Some(op) = op {
            out.push(Jeton::new(Tok::Op(op), i, i + 1));
            i += 1;
            continue;
        }

        // Exposants ⁰..⁹ (suite de chiffres) : ^ puis le nombre, même intervalle
        if chiffre_exposant(c).is_some() {
            let start = i;
            let mut n = 0.0;
            while let Some(d) = chars.get(i).copied().and_then(chiffre_exposant) {
                n = n * 10.0 + d;
                i += 1;
            }
            out.push(Jeton::new(Tok::Op(Op::Puissance), start, i));
            out.push(Jeton::new(Tok::Nombre(n), start, i));
            continue;
        }

        // Symboles d’un seul caractère
        if matches!(c, 'π' | '√' | '∛' | '∜') {
            out.push(Jeton::new(Tok::Ident(c.to_string()), i, i + 1));
            i += 1;
            continue;
        }

        // Identifiants
        if c.is_alphabetic() || c == '_' {
            let start = i;
            while i < chars.len() && (chars[i].is_alphabetic() || chars[i] == '_') && chars[i] != 'π'
            {
                i += 1;
            }
            // suffixe collé : ⁻¹ (inverse) ou indice (log₂)
            if i + 1 < chars.len() && chars[i] == '⁻' && chars[i + 1] == '¹' {
                i += 2;
            } else {
                while i < chars.len() && ('₀'..='₉').contains(&chars[i]) {
                    i += 1;
                }
            }
            let word: String = chars[start..i].iter().collect();
            out.push(Jeton::new(Tok::Ident(word), start, i));
            continue;
        }

        // Nombres
        if c.is_ascii_digit() || c == '.' {
            let start = i;
            while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                i += 1;
            }

            let mut texte: String = chars[start..i].iter().collect();

            // touche EE : 2EE3 = 2·10^3 ; sinon exposant e/E
            // (dans les deux cas seulement si un chiffre suit : "2e" = 2·e)
            let ee = chars.get(i) == Some(&'E') && chars.get(i + 1) == Some(&'E');
            let marque = if ee { 2 } else { 1 };
            if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
                let debut_exposant = i + marque;
                let mut j = debut_exposant;
                if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
                    j += 1;
                }
                if j < chars.len() && chars[j].is_ascii_digit() {
                    while j < chars.len() && chars[j].is_ascii_digit() {
                        j += 1;
                    }
                    let exposant: String = chars[debut_exposant..j].iter().collect();
                    texte = format!("{texte}e{exposant}");
                    i = j;
                }
            }

            let v = match texte.parse::<f64>() {
                Ok(v) if v.is_finite() => v,
                _ => {
                    return Err(ErreurLexicale::NombreInvalide {
                        texte,
                        position: start,
                    })
                }
            };
            out.push(Jeton::new(Tok::Nombre(v), start, i));
            continue;
        }

        return Err(ErreurLexicale::CaractereInattendu {
            caractere: c,
            position: i,
        });
    }

    out.push(Jeton::new(Tok::Fin, chars.len(), chars.len()));
    Ok(out)
}

fn chiffre_exposant(c: char) -> Option<f64> {
    let d = match c {
        '⁰' => 0,
        '¹' => 1,
        '²' => 2,
        '³' => 3,
        '⁴' => 4,
        '⁵' => 5,
        '⁶' => 6,
        '⁷' => 7,
        '⁸' => 8,
        '⁹' => 9,
        _ => return None,
    };
    Some(f64::from(d))
}

/// Format utilitaire (démarche) : liste de jetons en texte, sans Tok::Fin.
pub fn format_tokens(tokens: &[Jeton]) -> String {
    tokens
        .iter()
        .filter(|j| j.tok != Tok::Fin)
        .map(|j| j.tok.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Texte “étiquette” : uniquement lettres ASCII et espaces (au moins une lettre).
/// L’appelant n’évalue pas ces lignes, il les garde comme annotation.
pub fn is_label_text(s: &str) -> bool {
    s.chars().any(|c| c.is_ascii_alphabetic())
        && s.chars().all(|c| c.is_ascii_alphabetic() || c.is_whitespace())
}
