// src/app/vue.rs
//
// Vue terminal : une ligne -> une sortie
// --------------------------------------
// Objectifs :
// - Même AppCalc (etat.rs) pour l’appel unique et la session
// - Formats de sortie : reponse | calcul | complet | latex | apercu
// - Session : une ligne par calcul, commandes ":deg" ":rad" ":chiffres N" ":clr" ":ac" ":q"
// - Ligne déséquilibrée : fermantes suggérées avant le verdict
//
// Note :
// - Les lignes étiquette ("hello world") sont recopiées, jamais évaluées
// - Les erreurs de calcul n’arrêtent pas la session

use std::io::{self, BufRead, Write};

use clap::ValueEnum;
use tracing::{debug, warn};

use calculatrice_sci::noyau::format::texte;
use calculatrice_sci::noyau::lecture::formater_latex;
use calculatrice_sci::{bracket_balance_suffix, demarche, is_label_text, preview_evaluate_avec, ModeAngle};

use super::etat::AppCalc;

/// Ce que l’on écrit après un calcul.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Sortie {
    /// Valeur seule : "14"
    #[default]
    Reponse,
    /// Entrée et valeur : "2(3+4) = 14"
    Calcul,
    /// Démarche pas à pas (jetons, normalisation, arbre, rendu, valeur)
    Complet,
    /// Rendu LaTeX et valeur : "2 \left(3 + 4\right) = 14"
    Latex,
    /// Aperçu de saisie (fermantes ajoutées, rendu partiel sinon)
    Apercu,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Commande {
    Mode(ModeAngle),
    Chiffres(usize),
    ClearResultats,
    ResetTotal,
    Quitter,
}

fn lire_commande(ligne: &str) -> Result<Commande, String> {
    let mut mots = ligne.trim_start_matches(':').split_whitespace();
    let nom = mots.next().unwrap_or("");
    match nom {
        "q" | "quit" | "quitter" => Ok(Commande::Quitter),
        "ac" => Ok(Commande::ResetTotal),
        "clr" => Ok(Commande::ClearResultats),
        "chiffres" => {
            let n = mots.next().ok_or("usage: :chiffres N")?;
            n.parse::<usize>()
                .map(Commande::Chiffres)
                .map_err(|_| format!("nombre de chiffres invalide: {n}"))
        }
        autre => autre
            .parse::<ModeAngle>()
            .map(Commande::Mode)
            .map_err(|_| format!("commande inconnue: :{autre}")),
    }
}

impl AppCalc {
    /// Évalue `self.entree` et dépose le résultat (ou l’erreur) dans l’état.
    pub fn evaluer_entree(&mut self) {
        let s = self.entree.trim().to_string();
        if s.is_empty() {
            self.set_erreur("Entrée vide");
            return;
        }

        if is_label_text(&s) {
            let rendu = texte(&s);
            self.set_etiquette(s, rendu);
            return;
        }

        match demarche(&s, &self.config, self.mode()) {
            Ok(d) => {
                debug!(entree = %s, valeur = d.valeur, "calcul");
                self.set_resultats(d);
            }
            Err(e) => {
                debug!(entree = %s, erreur = %e, "calcul refusé");
                self.set_erreur(e.to_string());
            }
        }
    }

    /// Texte à écrire pour le dernier calcul, ou le message d’erreur.
    pub fn affichage(&self, sortie: Sortie) -> Result<String, String> {
        // l’aperçu ne dépend que de l’entrée : jamais d’erreur
        if sortie == Sortie::Apercu {
            return Ok(self.apercu());
        }

        if !self.erreur.is_empty() {
            return Err(self.erreur.clone());
        }

        let Some(d) = &self.demarche else {
            // étiquette
            return Ok(match sortie {
                Sortie::Latex => self.rendu.clone(),
                _ => self.reponse.clone(),
            });
        };

        Ok(match sortie {
            Sortie::Reponse => self.reponse.clone(),
            Sortie::Calcul => format!("{} = {}", self.entree.trim(), self.reponse),
            Sortie::Latex => format!(
                "{} = {}",
                d.rendu,
                formater_latex(d.valeur, self.config.chiffres)
            ),
            Sortie::Complet => [
                format!("entrée     : {}", self.entree.trim()),
                format!("jetons     : {}", d.jetons),
                format!("normalisés : {}", d.normalises),
                format!("arbre      : {}", d.arbre),
                format!("rendu      : {}", d.rendu),
                format!("mode       : {}", d.mode),
                format!("résultat   : {}", d.lecture),
            ]
            .join("\n"),
            Sortie::Apercu => self.apercu(),
        })
    }

    fn apercu(&self) -> String {
        preview_evaluate_avec(&self.entree, self.mode(), &self.config)
            .balisage()
            .unwrap_or_default()
            .to_string()
    }

    /// Session ligne par ligne : lit `entree` jusqu’à la fin (ou ":q"), écrit dans `sortie_texte`.
    pub fn session<R: BufRead, W: Write>(
        &mut self,
        entree: R,
        mut sortie_texte: W,
        sortie: Sortie,
    ) -> io::Result<()> {
        for ligne in entree.lines() {
            let ligne = ligne?;
            let s = ligne.trim();
            if s.is_empty() {
                continue;
            }

            if s.starts_with(':') {
                match lire_commande(s) {
                    Ok(Commande::Quitter) => break,
                    Ok(Commande::ClearResultats) => {
                        self.clear_resultats();
                        writeln!(sortie_texte, "résultats effacés")?;
                    }
                    Ok(Commande::ResetTotal) => {
                        self.reset_total();
                        writeln!(sortie_texte, "remise à zéro")?;
                    }
                    Ok(Commande::Mode(m)) => {
                        self.set_mode(m);
                        writeln!(sortie_texte, "mode: {m}")?;
                    }
                    Ok(Commande::Chiffres(n)) => {
                        self.set_chiffres(n);
                        writeln!(sortie_texte, "chiffres: {}", self.config.chiffres)?;
                    }
                    Err(msg) => {
                        warn!(ligne = s, "commande refusée");
                        writeln!(sortie_texte, "Erreur: {msg}")?;
                    }
                }
                continue;
            }

            let suffixe = bracket_balance_suffix(s, s.chars().count());
            if !suffixe.is_empty() && sortie != Sortie::Apercu {
                writeln!(sortie_texte, "fermantes suggérées: {suffixe}")?;
            }

            self.entree = s.to_string();
            self.evaluer_entree();
            match self.affichage(sortie) {
                Ok(t) => writeln!(sortie_texte, "{t}")?,
                Err(msg) => writeln!(sortie_texte, "Erreur: {msg}")?,
            }
            // C : la ligne est consommée, le résultat reste consultable
            self.clear_entree();
        }
        sortie_texte.flush()
    }
}
