// src/noyau/expr.rs
//
// AST (flottants 64 bits).
// - Num   : littéral
// - Const : constante de la table (pi, e), valeur résolue à l’analyse
// - Var   : symbole nu (ex: x) ; l’évaluation échoue (SymboleInconnu)
// - Unaire / Binaire : opérateurs
// - Appel : fonction de la table, calcul résolu à l’analyse
// - Groupe : parenthèses tapées par l’utilisateur (gardées pour le rendu)
//
// Chaque noeud possède ses enfants (Box / Vec) : pas de partage, pas de cycle.
// L’arbre vit le temps d’un cycle analyse -> évaluation -> rendu.

use std::fmt;

use super::jetons::Crochet;
use super::table::Calcul;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpUnaire {
    Neg,
    Factorielle, // x!
    Pourcent,    // x%
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpBinaire {
    Plus,
    Moins,
    Fois,
    FoisImplicite,
    Divise,
    Puissance,
}

impl OpBinaire {
    pub fn symbole(self) -> &'static str {
        match self {
            OpBinaire::Plus => "+",
            OpBinaire::Moins => "-",
            OpBinaire::Fois => "*",
            OpBinaire::FoisImplicite => "·",
            OpBinaire::Divise => "/",
            OpBinaire::Puissance => "^",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Num(f64),
    Const {
        nom: String,
        valeur: f64,
        glyphe: Option<String>,
    },
    Var(String),

    Unaire(OpUnaire, Box<Expr>),
    Binaire(OpBinaire, Box<Expr>, Box<Expr>),

    Appel {
        nom: String,
        calcul: Calcul,
        args: Vec<Expr>,
    },

    Groupe(Crochet, Box<Expr>),
}

impl Expr {
    pub fn unaire(op: OpUnaire, x: Expr) -> Expr {
        Expr::Unaire(op, Box::new(x))
    }

    pub fn binaire(op: OpBinaire, a: Expr, b: Expr) -> Expr {
        Expr::Binaire(op, Box::new(a), Box::new(b))
    }

    /// Retire les groupes extérieurs : ((x)) -> x
    pub fn sans_groupe(&self) -> &Expr {
        let mut e = self;
        while let Expr::Groupe(_, x) = e {
            e = x;
        }
        e
    }
}

/// Lecture structurelle : chaque opération imbriquée est parenthésée.
/// "2+3*4" => "2 + (3 * 4)" ; "2^3^2" => "2 ^ (3 ^ 2)".
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        ecrire(self, f, true)
    }
}

fn ecrire(e: &Expr, f: &mut fmt::Formatter<'_>, nu: bool) -> fmt::Result {
    let (ouvre, ferme) = if nu { ("", "") } else { ("(", ")") };

    match e {
        Expr::Num(v) => write!(f, "{v}"),
        Expr::Const { nom, .. } | Expr::Var(nom) => f.write_str(nom),

        Expr::Unaire(OpUnaire::Neg, x) => {
            write!(f, "{ouvre}-")?;
            ecrire(x, f, false)?;
            f.write_str(ferme)
        }
        Expr::Unaire(op, x) => {
            f.write_str(ouvre)?;
            ecrire(x, f, false)?;
            f.write_str(if *op == OpUnaire::Factorielle { "!" } else { "%" })?;
            f.write_str(ferme)
        }

        Expr::Binaire(op, a, b) => {
            f.write_str(ouvre)?;
            ecrire(a, f, false)?;
            write!(f, " {} ", op.symbole())?;
            ecrire(b, f, false)?;
            f.write_str(ferme)
        }

        Expr::Appel { nom, args, .. } => {
            write!(f, "{nom}(")?;
            for (k, a) in args.iter().enumerate() {
                if k > 0 {
                    f.write_str(", ")?;
                }
                ecrire(a, f, true)?;
            }
            f.write_str(")")
        }

        Expr::Groupe(c, x) => {
            write!(f, "{}", c.ouvrante())?;
            ecrire(x, f, true)?;
            write!(f, "{}", c.fermante())
        }
    }
}
