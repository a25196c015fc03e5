//! src/app/etat.rs
//!
//! État UI (sans vue).
//!
//! Rôle : contenir l’état de la calculatrice (champ de saisie, évaluateur,
//! saisie en direct, résultat validé, erreur, formulaire de variable) et offrir
//! les actions simples (C/CLR/AC, valider, naviguer) sans logique d’affichage.
//!
//! Contrats :
//! - Le champ de saisie est l’unique frontière avec le noyau (`ChampTexte`).
//! - Une erreur ne déclenche jamais de panic : elle est affichée avec sa position.

use tracing::{debug, info};

use crate::noyau::format::clean_input;
use crate::noyau::memoire::nom_valide;
use crate::noyau::{
    format_grouped, format_with_unit_suggestion, ChampTexte, ConfigCalc, ErreurCalc, Evaluateur,
    SaisieLive,
};

/// Le champ de saisie, vu par le noyau.
#[derive(Clone, Debug, Default)]
pub struct ChampEntree(pub String);

impl ChampTexte for ChampEntree {
    fn texte(&self) -> String {
        self.0.clone()
    }

    fn set_texte(&mut self, texte: &str) {
        self.0 = texte.to_string();
    }
}

#[derive(Clone, Debug)]
pub struct AppCalc {
    // --- entrée utilisateur ---
    pub entree: ChampEntree,

    // --- noyau ---
    pub evaluateur: Evaluateur,
    pub saisie: SaisieLive,

    // --- sorties ---
    pub resultat: String, // dernier calcul validé (avec suggestion d’unité)
    pub erreur: String,   // message + position (si le calcul validé échoue)

    // --- formulaire “définir une variable” ---
    pub var_nom: String,
    pub var_expr: String,

    // --- UX ---
    // Permet à vue.rs de redonner le focus à l’entrée après un clic sur un bouton.
    pub focus_entree: bool,
}

impl Default for AppCalc {
    fn default() -> Self {
        Self::new(ConfigCalc::default())
    }
}

impl AppCalc {
    pub fn new(config: ConfigCalc) -> Self {
        info!(?config, "démarrage de l’interface");
        Self {
            entree: ChampEntree::default(),
            evaluateur: Evaluateur::new(config),
            saisie: SaisieLive::default(),
            resultat: String::new(),
            erreur: String::new(),
            var_nom: String::new(),
            var_expr: String::new(),
            focus_entree: true, // au lancement, on veut pouvoir taper tout de suite
        }
    }

    pub fn config(&self) -> &ConfigCalc {
        self.evaluateur.config()
    }

    /// Résultat en direct (seulement si l’option est active).
    pub fn resultat_direct(&self) -> Option<&str> {
        if self.config().inline_results {
            self.saisie.resultat()
        } else {
            None
        }
    }

    /* ------------------------ Actions “boutons” ------------------------ */

    /// AC : remise à zéro totale (entrée, résultats, variables, historique, ans).
    pub fn reset_total(&mut self) {
        self.entree.0.clear();
        self.clear_resultats();
        self.evaluateur.reset();
        self.saisie.reset();
        self.focus_entree = true;
    }

    /// C : effacer seulement l’entrée (sans toucher aux résultats).
    pub fn clear_entree(&mut self) {
        self.entree.0.clear();
        self.synchroniser_saisie();
        self.focus_entree = true;
    }

    /// CLR : effacer résultat + erreur (sans toucher à l’entrée).
    pub fn clear_resultats(&mut self) {
        self.resultat.clear();
        self.erreur.clear();
        self.focus_entree = true;
    }

    /// On CONSERVE `resultat` (dernier calcul) pour ne pas “effacer l’écran” sur une faute.
    pub fn set_erreur(&mut self, e: &ErreurCalc) {
        self.erreur = format!("Erreur : {} (position {})", e.message(), e.position);
        self.focus_entree = true;
    }

    pub fn set_resultat(&mut self, texte: impl Into<String>) {
        self.erreur.clear();
        self.resultat = texte.into();
        self.focus_entree = true;
    }

    /* ------------------------ Saisie ------------------------ */

    /// À appeler après toute modification du champ (frappe, bouton, rappel).
    pub fn synchroniser_saisie(&mut self) {
        if !self.config().inline_results {
            return;
        }
        self.saisie.synchroniser(&self.entree, &mut self.evaluateur);
    }

    /// Enter / "=" : calcul validé (historisé).
    pub fn valider(&mut self) {
        let expr = clean_input(&self.entree.0);

        match self.evaluateur.evaluate(&expr) {
            Ok(v) => {
                let texte = if self.config().show_unit_suggestions {
                    format_with_unit_suggestion(&v)
                } else {
                    format_grouped(&v)
                };
                debug!(expr = %expr, resultat = %texte, "validé depuis l’interface");
                self.set_resultat(format!("{expr} = {texte}"));
            }
            Err(e) => self.set_erreur(&e),
        }
    }

    /// Ctrl+Z : entrée plus ancienne de l’historique.
    pub fn historique_precedent(&mut self) {
        self.saisie.precedent(&mut self.evaluateur, &mut self.entree);
        self.focus_entree = true;
    }

    /// Ctrl+Y : entrée plus récente (puis champ vide).
    pub fn historique_suivant(&mut self) {
        self.saisie.suivant(&mut self.evaluateur, &mut self.entree);
        self.focus_entree = true;
    }

    /// Clic sur une entrée du panneau historique.
    pub fn rappeler(&mut self, expr: &str) {
        self.entree.set_texte(expr);
        self.synchroniser_saisie();
        self.focus_entree = true;
    }

    pub fn effacer_historique(&mut self) {
        self.evaluateur.clear_history();
        self.saisie.reset();
        self.focus_entree = true;
    }

    /// Formulaire : `nom = expression`.
    pub fn affecter_variable(&mut self) {
        let nom = self.var_nom.trim().to_string();
        let expr = self.var_expr.trim().to_string();
        if nom.is_empty() {
            self.erreur = "Nom de variable manquant".to_string();
            return;
        }
        if !nom_valide(&nom) {
            self.erreur = format!("Nom de variable invalide : {nom}");
            return;
        }

        match self.evaluateur.set_variable_expr(&nom, &expr) {
            Ok(v) => {
                let nom = nom.trim_start_matches('$').to_lowercase();
                self.set_resultat(format!("${nom} = {}", format_grouped(&v)));
                self.var_nom.clear();
                self.var_expr.clear();
            }
            Err(e) => self.set_erreur(&e),
        }
    }
}
