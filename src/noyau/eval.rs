//! Noyau : évaluation numérique
//!
//! Expr -> f64 par récursion pure (aucun arrondi : l’affichage arrondit, voir lecture.rs).
//!
//! - chaque noeud est vérifié : un résultat non fini (dépassement, NaN) est une
//!   erreur de domaine, jamais une valeur silencieuse
//! - trig directe : argument lu dans le mode d’angle actif (angles spéciaux en degrés)
//! - trig inverse : résultat rendu dans le mode d’angle actif
//! - pourcentage relatif : nombre + b% = nombre·(1 + b/100) (200+10% = 220) ;
//!   après toute autre expression, b% vaut b/100 (50% + 50% = 1)

use num_traits::ToPrimitive;
use tracing::debug;

use super::erreurs::{ErreurCalc, ErreurDomaine};
use super::expr::{Expr, OpBinaire, OpUnaire};
use super::syntaxe::tokenize_and_parse_avec;
use super::table::{Calcul, Table};
use super::trig::{evaluer_trig, ModeAngle, TrigFn};

/// 170! est la plus grande factorielle représentable en f64.
const FACTORIELLE_MAX: u64 = 170;

/// API publique : évalue un arbre dans un mode d’angle.
pub fn evaluate(expr: &Expr, mode: ModeAngle) -> Result<f64, ErreurDomaine> {
    evaluer(expr, mode)
}

/// Texte -> valeur (table par défaut).
pub fn evaluate_text(texte: &str, mode: ModeAngle) -> Result<f64, ErreurCalc> {
    evaluate_text_avec(texte, &Table::default(), mode)
}

pub fn evaluate_text_avec(texte: &str, table: &Table, mode: ModeAngle) -> Result<f64, ErreurCalc> {
    let arbre = tokenize_and_parse_avec(texte, table)?;
    let v = evaluate(&arbre, mode)?;
    debug!(texte, %mode, valeur = v, "évaluation");
    Ok(v)
}

fn evaluer(e: &Expr, mode: ModeAngle) -> Result<f64, ErreurDomaine> {
    use Expr::*;

    let v = match e {
        Num(v) => *v,
        Const { valeur, .. } => *valeur,
        Var(nom) => return Err(ErreurDomaine::SymboleInconnu(nom.clone())),
        Groupe(_, x) => evaluer(x, mode)?,

        Unaire(OpUnaire::Neg, x) => -evaluer(x, mode)?,
        Unaire(OpUnaire::Factorielle, x) => factorielle(evaluer(x, mode)?)?,
        Unaire(OpUnaire::Pourcent, x) => evaluer(x, mode)? / 100.0,

        Binaire(op, a, b) => binaire(*op, a, b, mode)?,

        Appel { nom, calcul, args } => {
            let vals = args
                .iter()
                .map(|a| evaluer(a, mode))
                .collect::<Result<Vec<f64>, _>>()?;
            appel(nom, *calcul, &vals, mode)?
        }
    };

    fini(v)
}

fn fini(v: f64) -> Result<f64, ErreurDomaine> {
    if v.is_finite() {
        Ok(v)
    } else if v.is_nan() {
        Err(ErreurDomaine::hors_domaine("résultat indéterminé"))
    } else {
        Err(ErreurDomaine::hors_domaine("dépassement de capacité"))
    }
}

fn binaire(op: OpBinaire, a: &Expr, b: &Expr, mode: ModeAngle) -> Result<f64, ErreurDomaine> {
    let va = evaluer(a, mode)?;

    match op {
        OpBinaire::Plus | OpBinaire::Moins => {
            // nombre ± b% : pourcentage du nombre ; ailleurs b% vaut b/100
            let relatif = matches!(a, Expr::Num(_) | Expr::Const { .. });
            let vb = match b {
                Expr::Unaire(OpUnaire::Pourcent, p) if relatif => {
                    fini(va * evaluer(p, mode)? / 100.0)?
                }
                _ => evaluer(b, mode)?,
            };
            Ok(if op == OpBinaire::Plus { va + vb } else { va - vb })
        }
        OpBinaire::Fois | OpBinaire::FoisImplicite => Ok(va * evaluer(b, mode)?),
        OpBinaire::Divise => {
            let vb = evaluer(b, mode)?;
            if vb == 0.0 {
                return Err(ErreurDomaine::DivisionParZero);
            }
            Ok(va / vb)
        }
        OpBinaire::Puissance => puissance(va, evaluer(b, mode)?),
    }
}

fn puissance(base: f64, exp: f64) -> Result<f64, ErreurDomaine> {
    if base == 0.0 && exp < 0.0 {
        return Err(ErreurDomaine::DivisionParZero);
    }
    if base < 0.0 && exp.fract() != 0.0 {
        return Err(ErreurDomaine::hors_domaine(format!(
            "puissance non réelle: ({base})^{exp}"
        )));
    }
    Ok(base.powf(exp))
}

fn factorielle(x: f64) -> Result<f64, ErreurDomaine> {
    if x.fract() != 0.0 {
        return Err(ErreurDomaine::hors_domaine(format!(
            "factorielle d’un non-entier: {x}"
        )));
    }
    let n = x
        .to_u64()
        .ok_or_else(|| ErreurDomaine::hors_domaine(format!("factorielle d’un négatif: {x}")))?;
    if n > FACTORIELLE_MAX {
        return Err(ErreurDomaine::hors_domaine(format!(
            "factorielle trop grande: {n}! (max {FACTORIELLE_MAX}!)"
        )));
    }
    Ok((2..=n).map(|k| k as f64).product())
}

/// Racine n-ième ; les indices entiers impairs acceptent un radicande négatif.
fn racine(x: f64, n: f64) -> Result<f64, ErreurDomaine> {
    if n == 0.0 {
        return Err(ErreurDomaine::hors_domaine("racine d’indice nul"));
    }
    if x >= 0.0 {
        return Ok(x.powf(1.0 / n));
    }
    if n.fract() != 0.0 {
        return Err(ErreurDomaine::hors_domaine(format!(
            "racine d’indice non entier d’un négatif: {x}"
        )));
    }
    if n % 2.0 == 0.0 {
        return Err(ErreurDomaine::RacineNegative);
    }
    Ok(-(-x).powf(1.0 / n))
}

fn logarithme(nom: &str, x: f64) -> Result<f64, ErreurDomaine> {
    if x <= 0.0 {
        return Err(ErreurDomaine::hors_domaine(format!(
            "{nom} d’un nombre négatif ou nul: {x}"
        )));
    }
    Ok(x)
}

fn log_base(x: f64, b: f64) -> Result<f64, ErreurDomaine> {
    if b <= 0.0 || b == 1.0 {
        return Err(ErreurDomaine::hors_domaine(format!("base de logarithme invalide: {b}")));
    }
    Ok(if b == 10.0 {
        x.log10()
    } else if b == 2.0 {
        x.log2()
    } else {
        x.ln() / b.ln()
    })
}

fn argument(nom: &str, vals: &[f64], k: usize) -> Result<f64, ErreurDomaine> {
    vals.get(k)
        .copied()
        .ok_or_else(|| ErreurDomaine::hors_domaine(format!("{nom} : argument {} manquant", k + 1)))
}

fn appel(nom: &str, calcul: Calcul, vals: &[f64], mode: ModeAngle) -> Result<f64, ErreurDomaine> {
    use Calcul::*;

    let x = argument(nom, vals, 0)?;

    match calcul {
        Sin => evaluer_trig(TrigFn::Sin, x, mode),
        Cos => evaluer_trig(TrigFn::Cos, x, mode),
        Tan => evaluer_trig(TrigFn::Tan, x, mode),

        Asin | Acos => {
            if !(-1.0..=1.0).contains(&x) {
                return Err(ErreurDomaine::hors_domaine(format!(
                    "{nom} hors de [-1, 1]: {x}"
                )));
            }
            let r = if calcul == Asin { x.asin() } else { x.acos() };
            Ok(mode.depuis_radians(r))
        }
        Atan => Ok(mode.depuis_radians(x.atan())),

        Sinh => Ok(x.sinh()),
        Cosh => Ok(x.cosh()),
        Tanh => Ok(x.tanh()),
        Asinh => Ok(x.asinh()),
        Acosh => {
            if x < 1.0 {
                return Err(ErreurDomaine::hors_domaine(format!("{nom} < 1: {x}")));
            }
            Ok(x.acosh())
        }
        Atanh => {
            if x <= -1.0 || x >= 1.0 {
                return Err(ErreurDomaine::hors_domaine(format!(
                    "{nom} hors de ]-1, 1[: {x}"
                )));
            }
            Ok(x.atanh())
        }

        Sqrt => {
            if x < 0.0 {
                return Err(ErreurDomaine::RacineNegative);
            }
            Ok(x.sqrt())
        }
        Cbrt => Ok(x.cbrt()),
        Root4 => racine(x, 4.0),
        Root => racine(x, argument(nom, vals, 1)?),
        Pow => puissance(x, argument(nom, vals, 1)?),

        Exp => Ok(x.exp()),
        Ln => Ok(logarithme(nom, x)?.ln()),
        Log => {
            let x = logarithme(nom, x)?;
            match vals.get(1) {
                Some(&b) => log_base(x, b),
                None => Ok(x.log10()),
            }
        }
        Log2 => Ok(logarithme(nom, x)?.log2()),

        Abs => Ok(x.abs()),
        Factorial => factorielle(x),

        // conversions explicites, indépendantes du mode
        Rad => Ok(x.to_radians()),
        Deg => Ok(x.to_degrees()),
    }
}
