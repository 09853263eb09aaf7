// src/noyau/trig.rs
//
// Trig et unités d’angle
// ----------------------
// - ModeAngle : degrés (défaut) ou radians, passé explicitement à l’évaluation
// - Angles spéciaux en degrés : multiples de 30° et 45° ramenés dans [0, 360)
//   => valeurs exactes de la table (sin(30) = 0.5 et pas 0.49999999999999994)
// - tan aux multiples impairs de 90° : indéfini

use std::f64::consts::FRAC_1_SQRT_2;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::erreurs::ErreurDomaine;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModeAngle {
    #[default]
    Degres,
    Radians,
}

impl ModeAngle {
    /// Argument saisi dans ce mode -> radians.
    pub fn vers_radians(self, x: f64) -> f64 {
        match self {
            ModeAngle::Degres => x.to_radians(),
            ModeAngle::Radians => x,
        }
    }

    /// Résultat en radians (asin, acos, atan) -> ce mode.
    pub fn depuis_radians(self, x: f64) -> f64 {
        match self {
            ModeAngle::Degres => x.to_degrees(),
            ModeAngle::Radians => x,
        }
    }

    pub fn symbole(self) -> &'static str {
        match self {
            ModeAngle::Degres => "deg",
            ModeAngle::Radians => "rad",
        }
    }
}

impl fmt::Display for ModeAngle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbole())
    }
}

impl FromStr for ModeAngle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "deg" | "degres" | "degrés" => Ok(ModeAngle::Degres),
            "rad" | "radians" => Ok(ModeAngle::Radians),
            autre => Err(format!("mode d’angle inconnu: {autre}")),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrigFn {
    Sin,
    Cos,
    Tan,
}

impl TrigFn {
    fn nom(self) -> &'static str {
        match self {
            TrigFn::Sin => "sin",
            TrigFn::Cos => "cos",
            TrigFn::Tan => "tan",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TrigOutcome {
    Valeur(f64),
    Indefini,
}

/// Reconnaît les angles spéciaux (en degrés) pour sin/cos/tan.
///
/// Retour:
/// - Some(Valeur(v)) si l’angle réduit est un multiple de 30° ou de 45°
/// - Some(Indefini) pour tan(90°), tan(270°)
/// - None sinon (calcul flottant ordinaire)
pub fn trig_special(degres: f64, f: TrigFn) -> Option<TrigOutcome> {
    if !degres.is_finite() {
        return None;
    }
    let a = degres.rem_euclid(360.0);
    if a.fract() != 0.0 {
        return None;
    }
    let a = a as i64;
    if a % 30 != 0 && a % 45 != 0 {
        return None;
    }

    let out = match f {
        TrigFn::Sin => TrigOutcome::Valeur(sin_table(a)),
        TrigFn::Cos => TrigOutcome::Valeur(sin_table((a + 90) % 360)),
        TrigFn::Tan => {
            let c = sin_table((a + 90) % 360);
            if c == 0.0 {
                TrigOutcome::Indefini
            } else {
                TrigOutcome::Valeur(tan_table(a))
            }
        }
    };
    Some(out)
}

fn sin_table(a: i64) -> f64 {
    let r3_2 = 3f64.sqrt() / 2.0;
    match a {
        0 | 180 => 0.0,
        30 | 150 => 0.5,
        45 | 135 => FRAC_1_SQRT_2,
        60 | 120 => r3_2,
        90 => 1.0,
        210 | 330 => -0.5,
        225 | 315 => -FRAC_1_SQRT_2,
        240 | 300 => -r3_2,
        270 => -1.0,
        _ => (a as f64).to_radians().sin(),
    }
}

fn tan_table(a: i64) -> f64 {
    let r3 = 3f64.sqrt();
    match a % 180 {
        0 => 0.0,
        30 => r3 / 3.0,
        45 => 1.0,
        60 => r3,
        120 => -r3,
        135 => -1.0,
        150 => -r3 / 3.0,
        r => (r as f64).to_radians().tan(),
    }
}

/// sin/cos/tan d’un argument exprimé dans `mode`.
pub fn evaluer_trig(f: TrigFn, x: f64, mode: ModeAngle) -> Result<f64, ErreurDomaine> {
    if mode == ModeAngle::Degres {
        match trig_special(x, f) {
            Some(TrigOutcome::Valeur(v)) => return Ok(v),
            Some(TrigOutcome::Indefini) => {
                return Err(ErreurDomaine::hors_domaine(format!(
                    "{}({x}°) indéfini",
                    f.nom()
                )))
            }
            None => {}
        }
    }

    let r = mode.vers_radians(x);
    Ok(match f {
        TrigFn::Sin => r.sin(),
        TrigFn::Cos => r.cos(),
        TrigFn::Tan => r.tan(),
    })
}
