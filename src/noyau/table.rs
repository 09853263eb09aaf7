// src/noyau/table.rs
//
// Table des noms reconnus : fonctions, constantes, alias.
// ------------------------------------------------------
// C’est le contrat commun de normalise.rs (têtes d’appel), syntaxe.rs (arité),
// eval.rs (calcul) et format.rs (glyphes). Elle se charge depuis la config
// (JSON) ; la table par défaut couvre la calculatrice scientifique.
//
// Règle de nommage :
// - clé exacte d’abord, puis minuscules ("SIN" -> "sin", "PI" -> "pi")
// - les alias se suivent en chaîne ; un cycle rend le nom d’origine

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Calcul intégré associé à un nom de fonction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Calcul {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Asinh,
    Acosh,
    Atanh,
    Sqrt,
    Cbrt,
    Root4,
    Root,
    Pow,
    Exp,
    Ln,
    Log,
    Log2,
    Abs,
    Factorial,
    Rad,
    Deg,
}

impl Calcul {
    /// Arité naturelle (bornes incluses).
    pub fn arite(self) -> RangeInclusive<usize> {
        match self {
            Calcul::Log => 1..=2,
            Calcul::Root | Calcul::Pow => 2..=2,
            _ => 1..=1,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntreeFonction {
    pub calcul: Calcul,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arite_min: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arite_max: Option<usize>,
}

impl EntreeFonction {
    pub fn new(calcul: Calcul) -> Self {
        Self {
            calcul,
            arite_min: None,
            arite_max: None,
        }
    }

    /// Arité effective : la table peut restreindre, jamais élargir.
    pub fn arite(&self) -> RangeInclusive<usize> {
        let nat = self.calcul.arite();
        let min = self.arite_min.unwrap_or(*nat.start()).max(*nat.start());
        let max = self.arite_max.unwrap_or(*nat.end()).min(*nat.end());
        min..=max
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntreeConstante {
    pub valeur: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glyphe: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Table {
    #[serde(default = "fonctions_defaut")]
    pub fonctions: BTreeMap<String, EntreeFonction>,
    #[serde(default = "constantes_defaut")]
    pub constantes: BTreeMap<String, EntreeConstante>,
    #[serde(default = "alias_defaut")]
    pub alias: BTreeMap<String, String>,
}

impl Default for Table {
    fn default() -> Self {
        Self {
            fonctions: fonctions_defaut(),
            constantes: constantes_defaut(),
            alias: alias_defaut(),
        }
    }
}

impl Table {
    /// Nom canonique après alias et casse.
    pub fn canonique(&self, nom: &str) -> String {
        let mut courant = self.cle(nom);
        let mut vus = vec![courant.clone()];

        while let Some(cible) = self.alias.get(&courant) {
            let suivant = self.cle(cible);
            if vus.contains(&suivant) {
                // cycle d’alias : on ne choisit pas
                return nom.to_string();
            }
            vus.push(suivant.clone());
            courant = suivant;
        }

        courant
    }

    pub fn fonction(&self, nom: &str) -> Option<&EntreeFonction> {
        self.fonctions.get(nom)
    }

    pub fn constante(&self, nom: &str) -> Option<&EntreeConstante> {
        self.constantes.get(nom)
    }

    pub fn est_fonction(&self, nom: &str) -> bool {
        self.fonctions.contains_key(nom)
    }

    pub fn est_constante(&self, nom: &str) -> bool {
        self.constantes.contains_key(nom)
    }

    fn connu(&self, nom: &str) -> bool {
        self.alias.contains_key(nom) || self.est_fonction(nom) || self.est_constante(nom)
    }

    fn cle(&self, nom: &str) -> String {
        if self.connu(nom) {
            return nom.to_string();
        }
        let bas = nom.to_lowercase();
        if self.connu(&bas) {
            bas
        } else {
            nom.to_string()
        }
    }
}

/* ------------------------ Table par défaut ------------------------ */

fn fonctions_defaut() -> BTreeMap<String, EntreeFonction> {
    use Calcul::*;

    let mut m: BTreeMap<String, EntreeFonction> = [
        ("sin", Sin),
        ("cos", Cos),
        ("tan", Tan),
        ("asin", Asin),
        ("acos", Acos),
        ("atan", Atan),
        ("sinh", Sinh),
        ("cosh", Cosh),
        ("tanh", Tanh),
        ("asinh", Asinh),
        ("acosh", Acosh),
        ("atanh", Atanh),
        ("sqrt", Sqrt),
        ("cbrt", Cbrt),
        ("root4", Root4),
        ("root", Root),
        ("pow", Pow),
        ("exp", Exp),
        ("ln", Ln),
        ("log", Log),
        ("log2", Log2),
        ("abs", Abs),
        ("factorial", Factorial),
        ("rad", Rad),
        ("deg", Deg),
    ]
    .into_iter()
    .map(|(nom, c)| (nom.to_string(), EntreeFonction::new(c)))
    .collect();

    // logbase(x, b) : log à base obligatoire
    m.insert(
        "logbase".to_string(),
        EntreeFonction {
            calcul: Log,
            arite_min: Some(2),
            arite_max: Some(2),
        },
    );

    m
}

fn constantes_defaut() -> BTreeMap<String, EntreeConstante> {
    let mut m = BTreeMap::new();
    m.insert(
        "pi".to_string(),
        EntreeConstante {
            valeur: std::f64::consts::PI,
            glyphe: Some("\\pi".to_string()),
        },
    );
    m.insert(
        "e".to_string(),
        EntreeConstante {
            valeur: std::f64::consts::E,
            glyphe: None,
        },
    );
    m
}

fn alias_defaut() -> BTreeMap<String, String> {
    [
        ("π", "pi"),
        ("√", "sqrt"),
        ("∛", "cbrt"),
        ("∜", "root4"),
        ("racine", "sqrt"),
        ("sin⁻¹", "asin"),
        ("cos⁻¹", "acos"),
        ("tan⁻¹", "atan"),
        ("sinh⁻¹", "asinh"),
        ("cosh⁻¹", "acosh"),
        ("tanh⁻¹", "atanh"),
        ("arcsin", "asin"),
        ("arccos", "acos"),
        ("arctan", "atan"),
        ("log₂", "log2"),
        ("log₁₀", "log"),
        ("fact", "factorial"),
    ]
    .into_iter()
    .map(|(a, c)| (a.to_string(), c.to_string()))
    .collect()
}
