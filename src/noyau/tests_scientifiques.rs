//! Tests scientifiques (campagne) : invariants + robustesse + limites contrôlées.
//!
//! But : trouver les limites sans faire chauffer la machine.
//! - budget temps global
//! - tailles bornées (profondeur, longueur)
//! - propriétés numériques (symétries, périodicité, identités) à tolérance près
//!
//! Notes :
//! - En degrés, les multiples de 30° et 45° passent par la table exacte : on peut
//!   comparer avec assert_eq!. Ailleurs on compare à 1e-9 près.
//! - Les sommes longues restent associatives à gauche (boucle, pas de pile) ;
//!   seules les imbrications comptent pour la profondeur.

use std::time::{Duration, Instant};

use super::erreurs::{ErreurAnalyse, ErreurCalc, ErreurDomaine, GenreSyntaxe};
use super::eval::evaluate_text;
use super::trig::ModeAngle;

fn eval_deg(expr: &str) -> f64 {
    evaluate_text(expr, ModeAngle::Degres).unwrap_or_else(|e| panic!("expr={expr:?} err={e}"))
}

fn eval_rad(expr: &str) -> f64 {
    evaluate_text(expr, ModeAngle::Radians).unwrap_or_else(|e| panic!("expr={expr:?} err={e}"))
}

fn assert_proche(a: f64, b: f64, expr: &str) {
    assert!(
        (a - b).abs() <= 1e-9 * b.abs().max(1.0),
        "expr={expr:?} : {a} ≠ {b}"
    );
}

fn assert_domaine(expr: &str) -> ErreurDomaine {
    match evaluate_text(expr, ModeAngle::Degres) {
        Err(ErreurCalc::Domaine(e)) => e,
        autre => panic!("expr={expr:?} : erreur de domaine attendue, obtenu {autre:?}"),
    }
}

/// Budget global anti-gel.
fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Exemples de référence ------------------------ */

#[test]
fn sci_exemples_de_reference() {
    assert_eq!(eval_deg("2+3*4"), 14.0);
    assert_eq!(eval_deg("2^3^2"), 512.0);
    assert_eq!(eval_deg("sqrt(16)"), 4.0);
    assert_eq!(eval_deg("sin(90)"), 1.0);
    assert_proche(eval_rad("sin(pi/2)"), 1.0, "sin(pi/2)");
    assert_eq!(eval_deg("2(3+4)"), 14.0);
    assert_eq!(assert_domaine("1/0"), ErreurDomaine::DivisionParZero);
    assert_eq!(assert_domaine("sqrt(-4)"), ErreurDomaine::RacineNegative);
    assert_eq!(
        assert_domaine("2x"),
        ErreurDomaine::SymboleInconnu("x".into())
    );
}

/* ------------------------ Invariants trig ------------------------ */

#[test]
fn sci_indefinis_tan() {
    for expr in ["tan(90)", "tan(270)", "tan(-90)", "tan(450)", "1 + tan(90)"] {
        assert!(
            matches!(assert_domaine(expr), ErreurDomaine::HorsDomaine(_)),
            "expr={expr:?}"
        );
    }
}

#[test]
fn sci_identites_symetrie() {
    // sin(-x) = -sin(x), cos(-x) = cos(x), tan(-x) = -tan(x)
    for x in ["30", "45", "60", "17", "123.4"] {
        let s = eval_deg(&format!("sin({x})"));
        assert_proche(eval_deg(&format!("sin(-{x})")), -s, x);

        let c = eval_deg(&format!("cos({x})"));
        assert_proche(eval_deg(&format!("cos(-{x})")), c, x);

        let t = eval_deg(&format!("tan({x})"));
        assert_proche(eval_deg(&format!("tan(-{x})")), -t, x);
    }
}

#[test]
fn sci_periodicite_angles() {
    // exacts : la réduction modulo 360 passe par la table
    assert_eq!(eval_deg("sin(45+360)"), eval_deg("sin(45)"));
    assert_eq!(eval_deg("cos(60+720)"), 0.5);
    assert_eq!(eval_deg("tan(30+180)"), eval_deg("tan(30)"));

    // radians : périodicité à tolérance près
    assert_proche(eval_rad("sin(1 + 2pi)"), eval_rad("sin(1)"), "sin(1+2π)");
    assert_proche(eval_rad("tan(1 + pi)"), eval_rad("tan(1)"), "tan(1+π)");
}

#[test]
fn sci_pythagore() {
    for x in ["0", "10", "33.3", "75", "200"] {
        let v = eval_deg(&format!("sin({x})^2 + cos({x})^2"));
        assert_proche(v, 1.0, x);
    }
    assert_proche(eval_deg("sin(30)^2 + cos(30)^2"), 1.0, "30°");
}

#[test]
fn sci_inverses_dans_le_mode_actif() {
    assert_proche(eval_deg("asin(sin(40))"), 40.0, "asin∘sin deg");
    assert_proche(eval_deg("acos(0.5)"), 60.0, "acos deg");
    assert_proche(eval_rad("acos(0.5)"), std::f64::consts::FRAC_PI_3, "acos rad");
    assert_proche(eval_deg("sin⁻¹(1)"), 90.0, "sin⁻¹");
}

/* ------------------------ Cohérence algébrique ------------------------ */

#[test]
fn sci_zero_algebrique() {
    assert_proche(eval_deg("(1/2 + 1/3) - 5/6"), 0.0, "rationnels");
    assert_proche(eval_deg("sqrt(2)*sqrt(2) - 2"), 0.0, "√2²");
    assert_proche(eval_deg("1/sqrt(3) - sqrt(3)/3"), 0.0, "rationalisation");
    assert_proche(eval_deg("ln(e^3) - 3"), 0.0, "ln∘exp");
    assert_proche(eval_deg("log(10^5) - 5"), 0.0, "log10");
    assert_proche(eval_deg("exp(ln(7)) - 7"), 0.0, "exp∘ln");
}

#[test]
fn sci_pourcentages() {
    assert_eq!(eval_deg("200+10%"), 220.0);
    assert_eq!(eval_deg("200-25%"), 150.0);
    assert_eq!(eval_deg("10%"), 0.1);
    assert_eq!(eval_deg("50%*4"), 2.0);
}

#[test]
fn sci_factorielles() {
    assert_eq!(eval_deg("5!"), 120.0);
    assert_eq!(eval_deg("3!!"), 720.0);
    assert_proche(eval_deg("170!"), 7.257415615307994e306, "170!");
    assert!(matches!(
        assert_domaine("171!"),
        ErreurDomaine::HorsDomaine(_)
    ));
}

/* ------------------------ Stress contrôlé (sans brûler) ------------------------ */

#[test]
fn sci_stress_profondeur_sqrt_safe() {
    let t0 = Instant::now();
    let max = Duration::from_millis(200);

    // sqrt(...)^2 alterné : profondeur modérée, valeur stable
    let mut expr = "4".to_string();
    for k in 0..40 {
        expr = if k % 2 == 0 {
            format!("sqrt({expr})")
        } else {
            format!("({expr})^2")
        };
        budget(t0, max);
    }

    assert_proche(eval_deg(&expr), 4.0, "sqrt/^2");
}

#[test]
fn sci_stress_taille_somme_safe() {
    let t0 = Instant::now();
    let max = Duration::from_millis(200);

    let mut expr = String::new();
    for k in 0..300 {
        if k > 0 {
            expr.push_str(" + ");
        }
        expr.push_str("1/2");
        budget(t0, max);
    }

    // 300*(1/2)=150
    assert_eq!(eval_deg(&expr), 150.0);
}

#[test]
fn sci_stress_imbrication_refusee_proprement() {
    let t0 = Instant::now();
    let max = Duration::from_millis(200);

    let expr = format!("{}1{}", "(".repeat(5000), ")".repeat(5000));
    let r = evaluate_text(&expr, ModeAngle::Degres);
    budget(t0, max);

    match r {
        Err(ErreurCalc::Analyse(ErreurAnalyse::Syntaxe(e))) => {
            assert_eq!(e.genre, GenreSyntaxe::TropImbrique)
        }
        autre => panic!("imbrication refusée attendue, obtenu {autre:?}"),
    }

    // juste sous la limite : accepté
    let ok = format!("{}1{}", "(".repeat(100), ")".repeat(100));
    assert_eq!(eval_deg(&ok), 1.0);
}

#[test]
fn sci_stress_grands_nombres_safe() {
    let big = "9".repeat(100);
    // 1e100 tient dans un f64
    assert_proche(eval_deg(&format!("{big}/7")), 1e100 / 7.0, "9…9/7");

    // au-delà : dépassement signalé, pas d’infini silencieux
    assert!(matches!(
        assert_domaine("10^308 * 10"),
        ErreurDomaine::HorsDomaine(_)
    ));
}
