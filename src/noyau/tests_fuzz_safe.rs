//! Tests fuzz safe : robustesse + déterminisme + limites contrôlées.
//!
//! But : marteler le pipeline sans brûler la machine.
//! - RNG déterministe (seed fixe) pour les campagnes, proptest pour les propriétés
//! - profondeur bornée
//! - budget temps global
//! - on accepte les erreurs de domaine (division par zéro, tan(90°)…) mais jamais
//!   une erreur d’analyse sur une expression bien formée
//! - invariants clés : l’aperçu ne panique jamais, le reste souple est un suffixe
//!   du texte, les fermantes suggérées équilibrent le texte

use std::time::{Duration, Instant};

use proptest::prelude::*;

use super::apercu::{preview_evaluate, Apercu};
use super::crochets::bracket_balance_suffix;
use super::erreurs::ErreurCalc;
use super::eval::evaluate_text;
use super::jetons::tokenize;
use super::normalise::normalize;
use super::syntaxe::{parse_lenient, tokenize_and_parse};
use super::table::Table;
use super::trig::ModeAngle;

/* ------------------------ RNG déterministe minimal ------------------------ */

#[derive(Clone)]
struct Rng {
    state: u64,
}
impl Rng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }
    fn next_u32(&mut self) -> u32 {
        // LCG simple (déterministe)
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }
    fn pick(&mut self, n: u32) -> u32 {
        if n == 0 {
            0
        } else {
            self.next_u32() % n
        }
    }
    fn coin(&mut self) -> bool {
        (self.next_u32() & 1) == 1
    }
}

/* ------------------------ Budget anti-gel ------------------------ */

fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Génération d’expressions (bornée) ------------------------ */

fn gen_nombre(rng: &mut Rng) -> String {
    match rng.pick(6) {
        0 => "0".to_string(),
        1 => format!("{}", rng.pick(10)),
        2 => format!("{}.{}", rng.pick(100), rng.pick(10)),
        3 => format!("{}", 30 * rng.pick(13)), // angles spéciaux
        4 => format!("{}e{}", 1 + rng.pick(9), rng.pick(4)),
        _ => format!("{}", 1 + rng.pick(999)),
    }
}

fn gen_atom(rng: &mut Rng) -> String {
    match rng.pick(6) {
        0 | 1 | 2 => gen_nombre(rng),
        3 => "pi".to_string(),
        4 => "e".to_string(),
        _ => format!("{}!", rng.pick(8)),
    }
}

fn gen_groupe(rng: &mut Rng, interieur: String) -> String {
    match rng.pick(3) {
        0 => format!("({interieur})"),
        1 => format!("[{interieur}]"),
        _ => format!("{{{interieur}}}"),
    }
}

fn gen_expr(rng: &mut Rng, depth: usize) -> String {
    if depth == 0 {
        return gen_atom(rng);
    }

    let a = |rng: &mut Rng| gen_expr(rng, depth - 1);

    match rng.pick(12) {
        0 => gen_atom(rng),
        1 => format!("{}+{}", a(rng), a(rng)),
        2 => format!("{}-{}", a(rng), a(rng)),
        3 => format!("{}*{}", a(rng), a(rng)),
        4 => format!("{}/{}", a(rng), a(rng)),
        5 => {
            let x = a(rng);
            gen_groupe(rng, x)
        }
        6 => format!("-{}", a(rng)),
        7 => format!("{}^{}", gen_atom(rng), rng.pick(4)),
        8 => {
            let f = ["sin", "cos", "tan", "sqrt", "abs", "ln", "log", "atan"][rng.pick(8) as usize];
            format!("{f}({})", a(rng))
        }
        9 => format!("2({})", a(rng)),
        10 => {
            if rng.coin() {
                format!("√{}", gen_atom(rng))
            } else {
                format!("{}%", gen_nombre(rng))
            }
        }
        _ => format!("log({}, {})", a(rng), 2 + rng.pick(9)),
    }
}

fn prefixe(texte: &str, n: usize) -> String {
    texte.chars().take(n).collect()
}

/* ------------------------ Tests (campagnes) ------------------------ */

#[test]
fn fuzz_safe_expressions_bien_formees() {
    let t0 = Instant::now();
    let max = Duration::from_millis(400);

    // Même seed => mêmes expressions => mêmes sorties (déterminisme)
    let mut rng = Rng::new(0xC0FFEE_u64);

    let mut seen_ok = 0usize;
    let mut seen_err = 0usize;

    for _ in 0..200 {
        budget(t0, max);

        let expr = gen_expr(&mut rng, 4);
        let mode = if rng.coin() {
            ModeAngle::Degres
        } else {
            ModeAngle::Radians
        };

        match evaluate_text(&expr, mode) {
            Ok(v) => {
                assert!(v.is_finite(), "expr={expr:?} v={v}");
                // y compris "pi" ou "e" seuls
                assert!(
                    matches!(preview_evaluate(&expr, mode), Apercu::Complet(_)),
                    "aperçu incomplet pour expr={expr:?}"
                );
                seen_ok += 1;
            }
            Err(ErreurCalc::Domaine(_)) => {
                assert!(
                    matches!(preview_evaluate(&expr, mode), Apercu::RenduSeul(_)),
                    "expr={expr:?}"
                );
                seen_err += 1;
            }
            Err(e) => panic!("erreur d’analyse inattendue: expr={expr:?} err={e}"),
        }
    }

    // On veut voir un mix des deux, sinon le fuzz ne “balaye” rien.
    assert!(seen_ok > 20, "trop peu de succès: {seen_ok}");
    assert!(seen_err > 0, "aucune erreur vue: fuzz trop “sage”");
}

#[test]
fn fuzz_safe_saisie_en_cours() {
    let t0 = Instant::now();
    let max = Duration::from_millis(400);

    let mut rng = Rng::new(0xBADC0DE_u64);
    let table = Table::default();

    for _ in 0..80 {
        budget(t0, max);

        let expr = gen_expr(&mut rng, 3);
        let n = expr.chars().count();

        // chaque préfixe = une frappe de l’utilisateur
        for k in 0..=n {
            let saisie = prefixe(&expr, k);

            let _ = preview_evaluate(&saisie, ModeAngle::Degres);

            let p = parse_lenient(&saisie, &table);
            assert!(saisie.ends_with(&p.reste), "saisie={saisie:?} reste={:?}", p.reste);

            let suffixe = bracket_balance_suffix(&saisie, k);
            let fermee = format!("{saisie}{suffixe}");
            assert_eq!(
                bracket_balance_suffix(&fermee, fermee.chars().count()),
                "",
                "saisie={saisie:?}"
            );
        }
    }
}

#[test]
fn fuzz_safe_souple_egal_strict_si_valide() {
    let t0 = Instant::now();
    let max = Duration::from_millis(300);

    let mut rng = Rng::new(0x5EED_u64);
    let table = Table::default();

    for _ in 0..150 {
        budget(t0, max);

        let expr = gen_expr(&mut rng, 4);
        let strict = tokenize_and_parse(&expr).unwrap_or_else(|e| panic!("expr={expr:?} err={e}"));
        let souple = parse_lenient(&expr, &table);

        assert!(souple.est_complet(), "expr={expr:?}");
        assert_eq!(souple.arbre, Some(strict), "expr={expr:?}");
    }
}

#[test]
fn fuzz_safe_bruit_aleatoire() {
    let t0 = Instant::now();
    let max = Duration::from_millis(300);

    let alphabet: Vec<char> = "0123456789.+-*/^!%()[]{},  xysinpcoeπ√²$#\\".chars().collect();
    let mut rng = Rng::new(0xFEED_u64);

    for _ in 0..400 {
        budget(t0, max);

        let len = rng.pick(24) as usize;
        let texte: String = (0..len)
            .map(|_| alphabet[rng.pick(alphabet.len() as u32) as usize])
            .collect();

        // ne doit jamais paniquer, quel que soit le résultat
        let _ = evaluate_text(&texte, ModeAngle::Degres);
        let _ = preview_evaluate(&texte, ModeAngle::Radians);
    }
}

/* ------------------------ Propriétés (proptest) ------------------------ */

proptest! {
    /// normalize(normalize(t)) == normalize(t)
    #[test]
    fn prop_normalisation_idempotente(s in "[0-9a-z+*/^!%()\\[\\]{},. √π²-]{0,30}") {
        let table = Table::default();
        if let Ok(jetons) = tokenize(&s) {
            let une = normalize(&jetons, &table);
            let deux = normalize(&une, &table);
            prop_assert_eq!(une, deux);
        }
    }

    /// L’aperçu ne panique jamais et ne rend Vide que sur du blanc.
    #[test]
    fn prop_apercu_ne_panique_jamais(s in ".{0,40}") {
        let a = preview_evaluate(&s, ModeAngle::Degres);
        prop_assert_eq!(a == Apercu::Vide, s.trim().is_empty());
    }

    /// Fermantes suggérées : uniquement des fermantes, et le texte fermé est équilibré.
    #[test]
    fn prop_equilibre_total(s in ".{0,40}", curseur in 0usize..64) {
        let suffixe = bracket_balance_suffix(&s, curseur);
        let que_des_fermantes = suffixe.chars().all(|c| matches!(c, ')' | ']' | '}'));
        prop_assert!(que_des_fermantes, "suffixe={:?}", suffixe);

        let debut = prefixe(&s, curseur);
        let ferme = format!("{debut}{suffixe}");
        prop_assert_eq!(bracket_balance_suffix(&ferme, ferme.chars().count()), "");
    }

    /// Le reste souple est toujours un suffixe du texte saisi.
    #[test]
    fn prop_reste_souple_suffixe(s in ".{0,40}") {
        let p = parse_lenient(&s, &Table::default());
        prop_assert!(s.ends_with(&p.reste));
        if p.erreur.is_none() {
            prop_assert!(p.reste.is_empty());
        }
    }
}
