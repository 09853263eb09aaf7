// src/noyau/normalise.rs
//
// Réécriture des jetons avant l’analyse (une passe, gauche -> droite).
// Règles:
// - Ident(nom) : alias + casse via la table (√ -> sqrt, sin⁻¹ -> asin, PI -> pi)
//    - Ident collé à un entier formant une fonction connue => une seule tête (log2, root4)
//    - si nom ∈ fonctions => Tok::Fonction (tête d’appel)
//    - mot inconnu de plusieurs lettres collé à une ouvrante => Tok::Fonction aussi
//      (syntaxe.rs signalera la fonction inconnue)
//    - sinon => Ident (constante ou variable)
// - Moins unaire : '-' sans valeur à gauche => Op::Neg ; '+' unaire supprimé
// - Multiplication implicite (Op::FoisImplicite, span vide) :
//    nombre  · ident | fonction | ouvrante
//    fermante· nombre | ident | fonction | ouvrante
//    ident   · nombre | ident | fonction | ouvrante
//    postfixe(! %) · ident | fonction | ouvrante
//
// Transformation pure : on produit un nouveau Vec, l’entrée n’est jamais modifiée.
// Idempotente : normalize(normalize(t)) == normalize(t).

use tracing::trace;

use super::jetons::{format_tokens, Jeton, Op, Tok};
use super::table::Table;

pub fn normalize(jetons: &[Jeton], table: &Table) -> Vec<Jeton> {
    let mut out: Vec<Jeton> = Vec::with_capacity(jetons.len() + jetons.len() / 2);

    let mut k = 0;
    while k < jetons.len() {
        let j = &jetons[k];
        let mut span = j.span;
        k += 1;

        let tok = match &j.tok {
            Tok::Ident(nom) => {
                if let Some((fusion, fin)) = nom_a_chiffres(nom, j, jetons.get(k), table) {
                    // log2, root4 : le nombre collé fait partie du nom
                    span.fin = fin;
                    k += 1;
                    Tok::Fonction(fusion)
                } else {
                    let nom = table.canonique(nom);
                    let suivant = jetons.get(k).map(|s| &s.tok);
                    if table.est_fonction(&nom) || est_appel_inconnu(&nom, suivant, table) {
                        Tok::Fonction(nom)
                    } else {
                        Tok::Ident(nom)
                    }
                }
            }
            Tok::Op(Op::Moins) if !valeur_a_gauche(out.last()) => Tok::Op(Op::Neg),
            Tok::Op(Op::Plus) if !valeur_a_gauche(out.last()) => continue,
            autre => autre.clone(),
        };

        if let Some(prec) = out.last() {
            if implicite(&prec.tok, &tok) {
                out.push(Jeton::new(
                    Tok::Op(Op::FoisImplicite),
                    span.debut,
                    span.debut,
                ));
            }
        }

        out.push(Jeton { tok, span });
    }

    trace!(jetons = %format_tokens(&out), "normalisation");
    out
}

/// Ident collé à un entier dont la concaténation est une fonction connue ("log" + "2").
/// Le nombre doit suivre sans espace et s’écrire en chiffres seuls ("log2.5", "log 2" : non).
fn nom_a_chiffres(
    nom: &str,
    ident: &Jeton,
    suivant: Option<&Jeton>,
    table: &Table,
) -> Option<(String, usize)> {
    let n = suivant?;
    let Tok::Nombre(v) = n.tok else {
        return None;
    };
    if n.span.debut != ident.span.fin || v < 0.0 || v.fract() != 0.0 || v > 1e6 {
        return None;
    }
    let chiffres = format!("{}", v as u64);
    if chiffres.chars().count() != n.span.fin - n.span.debut {
        return None;
    }
    let fusion = table.canonique(&format!("{nom}{chiffres}"));
    table.est_fonction(&fusion).then_some((fusion, n.span.fin))
}

fn est_appel_inconnu(nom: &str, suivant: Option<&Tok>, table: &Table) -> bool {
    !table.est_constante(nom)
        && nom.chars().count() > 1
        && matches!(suivant, Some(Tok::Ouvrante(_)))
}

/// Le dernier jeton émis termine-t-il une valeur ?
fn valeur_a_gauche(prec: Option<&Jeton>) -> bool {
    match prec.map(|j| &j.tok) {
        Some(Tok::Nombre(_) | Tok::Ident(_) | Tok::Fermante(_)) => true,
        Some(Tok::Op(op)) => op.est_postfixe(),
        _ => false,
    }
}

fn implicite(prec: &Tok, cur: &Tok) -> bool {
    let debut_valeur = matches!(cur, Tok::Ident(_) | Tok::Fonction(_) | Tok::Ouvrante(_));

    match prec {
        Tok::Nombre(_) => debut_valeur,
        Tok::Fermante(_) | Tok::Ident(_) => debut_valeur || matches!(cur, Tok::Nombre(_)),
        Tok::Op(op) if op.est_postfixe() => debut_valeur,
        _ => false,
    }
}
