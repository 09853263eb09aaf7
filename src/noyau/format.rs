// src/noyau/format.rs
//
// Rendu LaTeX (KaTeX) d’un arbre.
// - / -> \frac{}{} (groupes extérieurs du numérateur/dénominateur retirés)
// - ^ -> {base}^{exposant}
// - * -> \cdot ; multiplication implicite -> juxtaposition
// - groupes tapés -> \left( \right), \left[ \right], \left\{ \right\}
// - parenthèses ajoutées seulement si un enfant lie moins fort que son parent
//   et que l’arbre n’a pas déjà un groupe à cet endroit

use super::expr::{Expr, OpBinaire, OpUnaire};
use super::jetons::Crochet;
use super::lecture::formater_latex;
use super::syntaxe::Partiel;
use super::table::Calcul;

/// Chiffres conservés pour un nombre saisi.
const CHIFFRES_SAISIE: usize = 15;

// Niveaux de liaison (plus grand = lie plus fort)
const N_SOMME: u8 = 1;
const N_PRODUIT: u8 = 2;
const N_NEG: u8 = 3;
const N_PUISSANCE: u8 = 4;
const N_POSTFIXE: u8 = 5;
const N_ATOME: u8 = 6;

fn niveau(e: &Expr) -> u8 {
    match e {
        Expr::Binaire(OpBinaire::Plus | OpBinaire::Moins, ..) => N_SOMME,
        Expr::Binaire(OpBinaire::Puissance, ..) => N_PUISSANCE,
        Expr::Binaire(..) => N_PRODUIT,
        Expr::Unaire(OpUnaire::Neg, _) => N_NEG,
        Expr::Unaire(..) => N_POSTFIXE,
        Expr::Num(v) if v.is_sign_negative() && *v != 0.0 => N_NEG,
        Expr::Appel {
            calcul: Calcul::Pow,
            ..
        } => N_PUISSANCE,
        Expr::Appel {
            calcul: Calcul::Factorial,
            ..
        } => N_POSTFIXE,
        _ => N_ATOME,
    }
}

/// Glyphe LaTeX d’une fonction rendue sous la forme glyphe\left(args\right).
pub fn glyphe(calcul: Calcul) -> &'static str {
    use Calcul::*;
    match calcul {
        Sin => "\\sin",
        Cos => "\\cos",
        Tan => "\\tan",
        Asin => "\\arcsin",
        Acos => "\\arccos",
        Atan => "\\arctan",
        Sinh => "\\sinh",
        Cosh => "\\cosh",
        Tanh => "\\tanh",
        Asinh => "\\operatorname{arsinh}",
        Acosh => "\\operatorname{arcosh}",
        Atanh => "\\operatorname{artanh}",
        Exp => "\\exp",
        Ln => "\\ln",
        Log => "\\log",
        Log2 => "\\log_{2}",
        Rad => "\\operatorname{rad}",
        Deg => "\\operatorname{deg}",
        Sqrt => "\\sqrt",
        Cbrt => "\\sqrt[3]",
        Root4 => "\\sqrt[4]",
        Root => "\\sqrt",
        Pow => "\\operatorname{pow}",
        Abs => "\\operatorname{abs}",
        Factorial => "\\operatorname{fact}",
    }
}

/// API publique : arbre -> balisage LaTeX.
pub fn typeset(e: &Expr) -> String {
    let mut out = String::new();
    ecrire(e, &mut out);
    out
}

/// Arbre partiel + reste brut échappé dans \text{}.
pub fn typeset_partial(p: &Partiel) -> String {
    let mut out = p.arbre.as_ref().map(typeset).unwrap_or_default();
    if !p.reste.is_empty() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(&texte(&p.reste));
    }
    out
}

/// Texte libre en mode texte : \text{…} avec les caractères spéciaux échappés.
pub fn texte(s: &str) -> String {
    format!("\\text{{{}}}", echapper_texte(s))
}

pub fn echapper_texte(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\textbackslash{}"),
            '{' | '}' | '%' | '#' | '$' | '&' | '_' => {
                out.push('\\');
                out.push(c);
            }
            '^' => out.push_str("\\textasciicircum{}"),
            '~' => out.push_str("\\textasciitilde{}"),
            _ => out.push(c),
        }
    }
    out
}

/* ------------------------ Écriture récursive ------------------------ */

/// Écrit `e`, entre parenthèses si son niveau est < min.
fn enfant(e: &Expr, min: u8, out: &mut String) {
    if niveau(e) < min {
        out.push_str("\\left(");
        ecrire(e, out);
        out.push_str("\\right)");
    } else {
        ecrire(e, out);
    }
}

fn accolades(e: &Expr, out: &mut String) {
    out.push('{');
    ecrire(e.sans_groupe(), out);
    out.push('}');
}

fn nom_symbole(nom: &str) -> String {
    if nom.chars().count() > 1 {
        format!("\\mathrm{{{nom}}}")
    } else {
        nom.to_string()
    }
}

fn ecrire(e: &Expr, out: &mut String) {
    match e {
        Expr::Num(v) => out.push_str(&formater_latex(*v, CHIFFRES_SAISIE)),

        Expr::Const { nom, glyphe, .. } => match glyphe {
            Some(g) => out.push_str(g),
            None => out.push_str(&nom_symbole(nom)),
        },
        Expr::Var(nom) => out.push_str(&nom_symbole(nom)),

        Expr::Unaire(OpUnaire::Neg, x) => {
            out.push('-');
            enfant(x, N_NEG, out);
        }
        Expr::Unaire(op, x) => {
            enfant(x, N_ATOME, out);
            out.push_str(if *op == OpUnaire::Factorielle { "!" } else { "\\%" });
        }

        Expr::Binaire(op, a, b) => binaire(*op, a, b, out),

        Expr::Appel { calcul, args, .. } => appel(*calcul, args, out),

        Expr::Groupe(k, x) => {
            let (g, d) = match k {
                Crochet::Rond => ("\\left(", "\\right)"),
                Crochet::Carre => ("\\left[", "\\right]"),
                Crochet::Accolade => ("\\left\\{", "\\right\\}"),
            };
            out.push_str(g);
            ecrire(x, out);
            out.push_str(d);
        }
    }
}

fn puissance(base: &Expr, exp: &Expr, out: &mut String) {
    out.push('{');
    enfant(base, N_POSTFIXE, out);
    out.push_str("}^");
    accolades(exp, out);
}

fn binaire(op: OpBinaire, a: &Expr, b: &Expr, out: &mut String) {
    match op {
        OpBinaire::Plus | OpBinaire::Moins => {
            enfant(a, N_SOMME, out);
            out.push_str(if op == OpBinaire::Plus { " + " } else { " - " });
            enfant(b, N_PRODUIT, out);
        }
        OpBinaire::Fois | OpBinaire::FoisImplicite => {
            enfant(a, N_PRODUIT, out);
            out.push_str(if op == OpBinaire::Fois { " \\cdot " } else { " " });
            enfant(b, N_NEG, out);
        }
        OpBinaire::Divise => {
            out.push_str("\\frac");
            accolades(a, out);
            accolades(b, out);
        }
        OpBinaire::Puissance => puissance(a, b, out),
    }
}

fn arguments(args: &[Expr], out: &mut String) {
    out.push_str("\\left(");
    for (k, a) in args.iter().enumerate() {
        if k > 0 {
            out.push_str(", ");
        }
        ecrire(a.sans_groupe(), out);
    }
    out.push_str("\\right)");
}

fn appel(calcul: Calcul, args: &[Expr], out: &mut String) {
    match (calcul, args) {
        (Calcul::Sqrt | Calcul::Cbrt | Calcul::Root4, [x]) => {
            out.push_str(glyphe(calcul));
            accolades(x, out);
        }
        (Calcul::Root, [x, n]) => {
            out.push_str("\\sqrt[");
            ecrire(n.sans_groupe(), out);
            out.push(']');
            accolades(x, out);
        }
        (Calcul::Pow, [x, y]) => puissance(x, y, out),
        (Calcul::Abs, [x]) => {
            out.push_str("\\left|");
            ecrire(x.sans_groupe(), out);
            out.push_str("\\right|");
        }
        (Calcul::Factorial, [x]) => {
            enfant(x, N_ATOME, out);
            out.push('!');
        }
        (Calcul::Log, [x, b]) => {
            out.push_str("\\log_");
            accolades(b, out);
            arguments(std::slice::from_ref(x), out);
        }
        _ => {
            out.push_str(glyphe(calcul));
            arguments(args, out);
        }
    }
}
