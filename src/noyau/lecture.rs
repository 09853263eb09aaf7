// src/noyau/lecture.rs
//
// Lecture décimale d’un résultat f64 (affichage uniquement).
// - arrondi à N chiffres significatifs (1..=17)
// - décimal si l’exposant décimal est dans [-9, 15), sinon notation scientifique
// - zéros finaux retirés, -0 affiché 0

/// Bornes de l’écriture décimale (exposant base 10).
const EXPOSANT_MIN: i32 = -9;
const EXPOSANT_MAX: i32 = 15;

pub const CHIFFRES_MAX: usize = 17;

pub fn borner_chiffres(chiffres: usize) -> usize {
    chiffres.clamp(1, CHIFFRES_MAX)
}

/// Décomposition arrondie : (mantisse texte "d.ddd", exposant).
fn scientifique(v: f64, chiffres: usize) -> (String, i32) {
    let s = format!("{:.*e}", chiffres - 1, v);
    match s.split_once('e') {
        Some((m, e)) => (m.to_string(), e.parse().unwrap_or(0)),
        None => (s, 0),
    }
}

fn retirer_zeros(mut s: String) -> String {
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    if s == "-0" {
        s = "0".to_string();
    }
    s
}

enum Lecture {
    Decimal(String),
    Scientifique(String, i32),
}

fn lire(v: f64, chiffres: usize) -> Lecture {
    if !v.is_finite() {
        return Lecture::Decimal(format!("{v}"));
    }
    if v == 0.0 {
        return Lecture::Decimal("0".to_string());
    }

    let chiffres = borner_chiffres(chiffres);
    let (mantisse, exposant) = scientifique(v, chiffres);

    if (EXPOSANT_MIN..EXPOSANT_MAX).contains(&exposant) {
        let decimales = (chiffres as i32 - 1 - exposant).max(0) as usize;
        Lecture::Decimal(retirer_zeros(format!("{v:.decimales$}")))
    } else {
        Lecture::Scientifique(retirer_zeros(mantisse), exposant)
    }
}

/// Texte brut : "14", "0.3333333333", "1.5e20".
pub fn formater_valeur(v: f64, chiffres: usize) -> String {
    match lire(v, chiffres) {
        Lecture::Decimal(s) => s,
        Lecture::Scientifique(m, e) => format!("{m}e{e}"),
    }
}

/// Balisage : "1.5 \times 10^{20}".
pub fn formater_latex(v: f64, chiffres: usize) -> String {
    match lire(v, chiffres) {
        Lecture::Decimal(s) => s,
        Lecture::Scientifique(m, e) => format!("{m} \\times 10^{{{e}}}"),
    }
}
