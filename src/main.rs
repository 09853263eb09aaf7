// src/main.rs
//
// Calculatrice scientifique : point d’entrée terminal
// ---------------------------------------------------
// - EXPRESSION en argument : une sortie, puis fin (code 1 si l’évaluation échoue)
// - sans EXPRESSION        : session ligne par ligne sur stdin (voir app/vue.rs)
//
// Traces : RUST_LOG prioritaire, sinon --verbose => debug, sinon warn.
// Les traces partent sur stderr, les résultats sur stdout.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use calculatrice_sci::{Config, ModeAngle};

mod app;

use app::{AppCalc, Sortie};

#[derive(Debug, Parser)]
#[command(
    name = "calculatrice_sci",
    version,
    about = "Calculatrice scientifique : évaluation, rendu LaTeX, aperçu de saisie"
)]
struct Cli {
    /// Expression à évaluer (sans expression : session interactive)
    expression: Option<String>,

    /// Unité d’angle (défaut : celle de la configuration, sinon degrés)
    #[arg(long, value_enum)]
    angle: Option<Angle>,

    /// Format de sortie
    #[arg(long, value_enum, default_value_t = Sortie::Reponse)]
    sortie: Sortie,

    /// Chiffres significatifs affichés (1..=17)
    #[arg(long)]
    chiffres: Option<usize>,

    /// Fichier de configuration JSON
    #[arg(long)]
    config: Option<PathBuf>,

    /// Traces de débogage sur stderr
    #[arg(long, short)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Angle {
    Deg,
    Rad,
}

impl From<Angle> for ModeAngle {
    fn from(a: Angle) -> Self {
        match a {
            Angle::Deg => ModeAngle::Degres,
            Angle::Rad => ModeAngle::Radians,
        }
    }
}

fn installer_traces(verbose: bool) {
    let defaut = if verbose { "debug" } else { "warn" };
    let filtre = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(defaut));
    tracing_subscriber::fmt()
        .with_env_filter(filtre)
        .with_writer(io::stderr)
        .init();
}

fn charger_config(cli: &Cli) -> Result<Config, calculatrice_sci::ErreurConfig> {
    let mut config = match &cli.config {
        Some(chemin) => Config::depuis_fichier(chemin)?,
        None => Config::default(),
    };
    if let Some(a) = cli.angle {
        config = config.avec_mode(a.into());
    }
    if let Some(n) = cli.chiffres {
        config = config.avec_chiffres(n);
    }
    Ok(config)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    installer_traces(cli.verbose);

    let config = match charger_config(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Erreur: {e}");
            return ExitCode::from(2);
        }
    };
    debug!(mode = %config.mode_angle, chiffres = config.chiffres, "configuration chargée");

    let mut app = AppCalc::new(config);

    match cli.expression {
        Some(expr) => {
            app.entree = expr;
            app.evaluer_entree();
            match app.affichage(cli.sortie) {
                Ok(texte) => {
                    println!("{texte}");
                    ExitCode::SUCCESS
                }
                Err(msg) => {
                    eprintln!("Erreur: {msg}");
                    ExitCode::FAILURE
                }
            }
        }
        None => {
            let stdin = io::stdin();
            let stdout = io::stdout();
            match app.session(stdin.lock(), stdout.lock(), cli.sortie) {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    eprintln!("Erreur: {e}");
                    ExitCode::FAILURE
                }
            }
        }
    }
}
