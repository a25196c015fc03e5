// src/main.rs
//
// Calculatrice à unités : point d’entrée NATIF + WEB (WASM)
// --------------------------------------------------------
// But:
// - NATIF (Linux/Windows/macOS) : arguments (clap) + traces (tracing-subscriber), puis
//     * `--eval <EXPR>` : une commande, réponse sur stdout, fin
//     * `--console`     : commandes lues ligne à ligne sur stdin (calc, calchist, calcset…)
//     * sinon           : fenêtre eframe::run_native
// - WEB  (wasm32)      : eframe::WebRunner + WebOptions + <canvas>
//
// Côté WEB (WASM) : ton index.html doit contenir un canvas :
//   <canvas id="the_canvas_id"></canvas>

#![cfg_attr(target_arch = "wasm32", allow(unused_imports))]

use eframe::egui;

mod app;
mod noyau;

use app::AppCalc;

/// Titre unique (natif + web).
const TITRE_APP: &str = "Calculatrice à unités";

/* ------------------------ Arguments + traces (natif) ------------------------ */

#[cfg(not(target_arch = "wasm32"))]
mod natif {
    use std::io::{self, BufRead, Write};

    use clap::Parser;
    use tracing::{info, warn};
    use tracing_subscriber::EnvFilter;

    use crate::noyau::commandes::executer;
    use crate::noyau::config::{ConfigCalc, PRECISION_DEFAUT};
    use crate::noyau::Evaluateur;

    /// Calculatrice décimale exacte avec unités de jeu (k, m, stacks, shulkers…).
    #[derive(Parser, Debug)]
    #[command(name = "calculatrice-unites", version)]
    pub struct Args {
        /// Précision décimale (le calcul interne garde au moins 50 chiffres)
        #[arg(long, default_value_t = PRECISION_DEFAUT)]
        pub precision: u32,

        /// Ne pas suggérer d’unité après un résultat (50m, 2 stacks…)
        #[arg(long)]
        pub no_unit_suggestions: bool,

        /// Désactiver Ctrl+Z / Ctrl+Y dans l’historique
        #[arg(long)]
        pub no_history_navigation: bool,

        /// Ne pas afficher le résultat en direct pendant la frappe
        #[arg(long)]
        pub no_inline: bool,

        /// Mode console : une commande par ligne sur stdin
        #[arg(long)]
        pub console: bool,

        /// Exécute une seule commande puis quitte (ex: --eval "2s + 10")
        #[arg(long, value_name = "EXPR")]
        pub eval: Option<String>,
    }

    impl Args {
        pub fn config(&self) -> ConfigCalc {
            ConfigCalc {
                decimal_precision: self.precision,
                show_unit_suggestions: !self.no_unit_suggestions,
                history_navigation: !self.no_history_navigation,
                inline_results: !self.no_inline,
            }
        }
    }

    /// `RUST_LOG` si présent, sinon `info`. Traces sur stderr (stdout = réponses).
    pub fn installer_traces() {
        let filtre = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        tracing_subscriber::fmt()
            .with_env_filter(filtre)
            .with_writer(io::stderr)
            .init();
    }

    /// `--eval` ou `--console`. Rend false si la fenêtre doit être ouverte.
    pub fn lancer_console(args: &Args) -> bool {
        let mut eval = Evaluateur::new(args.config());

        if let Some(ligne) = &args.eval {
            for reponse in executer(ligne, &mut eval) {
                println!("{reponse}");
            }
            return true;
        }

        if !args.console {
            return false;
        }

        info!("mode console (calchelp pour l’aide, Ctrl+D pour quitter)");
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        for ligne in stdin.lock().lines() {
            let ligne = match ligne {
                Ok(l) => l,
                Err(e) => {
                    warn!(erreur = %e, "lecture stdin interrompue");
                    break;
                }
            };
            if ligne.trim().is_empty() {
                continue;
            }
            for reponse in executer(&ligne, &mut eval) {
                if writeln!(stdout, "{reponse}").is_err() {
                    return true;
                }
            }
        }
        true
    }
}

/* ------------------------ Entrée NATIF (PC) ------------------------ */

#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result<()> {
    use clap::Parser;

    let args = natif::Args::parse();
    natif::installer_traces();

    if natif::lancer_console(&args) {
        return Ok(());
    }

    let config = args.config();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(TITRE_APP)
            .with_inner_size([520.0, 780.0])
            .with_min_inner_size([420.0, 620.0]),
        ..Default::default()
    };

    eframe::run_native(
        TITRE_APP,
        options,
        Box::new(move |_cc| Ok(Box::new(AppCalc::new(config)))),
    )
}

/* ------------------------ Entrée WEB (WASM) ------------------------ */

#[cfg(target_arch = "wasm32")]
fn main() {
    // En wasm32, le démarrage réel passe par `start()` (wasm_bindgen).
}

#[cfg(target_arch = "wasm32")]
mod web {
    use super::{AppCalc, TITRE_APP};

    use wasm_bindgen::JsCast;
    use web_sys::{window, HtmlCanvasElement};

    /// ID du canvas attendu dans index.html.
    const CANVAS_ID: &str = "the_canvas_id";

    /// Point d’entrée automatique au chargement de la page.
    /// - Fixe le titre de l’onglet (document.title)
    /// - Récupère le <canvas id="the_canvas_id">
    /// - Démarre eframe WebRunner dessus (config par défaut)
    #[wasm_bindgen::prelude::wasm_bindgen(start)]
    pub async fn start() -> Result<(), wasm_bindgen::JsValue> {
        let w = window().ok_or_else(|| js_err("window() indisponible"))?;
        let d = w
            .document()
            .ok_or_else(|| js_err("document() indisponible"))?;

        d.set_title(TITRE_APP);

        let el = d
            .get_element_by_id(CANVAS_ID)
            .ok_or_else(|| js_err("canvas introuvable (id incorrect dans index.html)"))?;

        let canvas: HtmlCanvasElement = el
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| js_err("l’élément trouvé n’est pas un <canvas>"))?;

        let web_options = eframe::WebOptions::default();

        eframe::WebRunner::new()
            .start(
                canvas,
                web_options,
                Box::new(|_cc| Ok(Box::<AppCalc>::default())),
            )
            .await
    }

    fn js_err(msg: &str) -> wasm_bindgen::JsValue {
        wasm_bindgen::JsValue::from_str(msg)
    }
}
