//! Noyau : évaluateur (pipeline réel)
//!
//! entrée -> jetons (ans résolu) -> descente récursive -> valeur -> ans (+ historique)
//!
//! Deux points d’entrée :
//! - `evaluate_quiet` : saisie en direct (chaque frappe), ne touche PAS l’historique
//! - `evaluate`       : calcul validé par l’utilisateur, enregistré dans l’historique
//!
//! Les deux mettent `ans` à jour.

use tracing::debug;

use super::analyse::Analyseur;
use super::config::ConfigCalc;
use super::decimal::Decimal;
use super::erreur::{ErreurCalc, GenreErreur};
use super::jetons::{format_tokens, tokenize};
use super::memoire::Memoire;

#[derive(Clone, Debug, Default)]
pub struct Evaluateur {
    config: ConfigCalc,
    memoire: Memoire,
}

impl Evaluateur {
    pub fn new(config: ConfigCalc) -> Self {
        Self {
            config,
            memoire: Memoire::default(),
        }
    }

    pub fn config(&self) -> &ConfigCalc {
        &self.config
    }

    /// Pipeline commun : vide -> jetons -> valeur -> ans.
    fn calculer(&mut self, expr: &str) -> Result<Decimal, ErreurCalc> {
        if expr.trim().is_empty() {
            return Err(ErreurCalc::new(GenreErreur::EmptyExpression, 0));
        }

        let jetons = tokenize(expr, self.memoire.last_answer())?;
        debug!(jetons = %format_tokens(&jetons), "tokenisation");

        let valeur =
            Analyseur::new(&jetons, &self.memoire, self.config.precision_interne()).evaluer()?;

        self.memoire.set_last_answer(valeur.clone());
        Ok(valeur)
    }

    /// Évaluation “en direct” : met `ans` à jour, jamais l’historique.
    pub fn evaluate_quiet(&mut self, expr: &str) -> Result<Decimal, ErreurCalc> {
        self.calculer(expr)
    }

    /// Évaluation validée : met `ans` à jour ET enregistre `expr` dans l’historique.
    pub fn evaluate(&mut self, expr: &str) -> Result<Decimal, ErreurCalc> {
        let resultat = self.calculer(expr);
        match &resultat {
            Ok(v) => {
                debug!(expr, resultat = %v, "calcul validé");
                self.memoire.record(expr);
            }
            Err(e) => debug!(expr, erreur = %e, "calcul refusé"),
        }
        resultat
    }

    /// Affectation directe.
    pub fn set_variable(&mut self, nom: &str, valeur: Decimal) {
        self.memoire.set_variable(nom, valeur);
    }

    /// Affectation par expression (évaluée avec `evaluate`, donc historisée).
    pub fn set_variable_expr(&mut self, nom: &str, expr: &str) -> Result<Decimal, ErreurCalc> {
        let valeur = self.evaluate(expr)?;
        self.memoire.set_variable(nom, valeur.clone());
        Ok(valeur)
    }

    pub fn last_answer(&self) -> &Decimal {
        self.memoire.last_answer()
    }

    /// Historique du plus ancien au plus récent (15 entrées max).
    pub fn history(&self) -> Vec<String> {
        self.memoire.history().map(str::to_string).collect()
    }

    pub fn clear_history(&mut self) {
        debug!("historique effacé");
        self.memoire.clear_history();
    }

    pub fn describe_variables(&self) -> String {
        self.memoire.describe_variables()
    }

    /// Remise à zéro totale (variables, historique, ans). La config est conservée.
    pub fn reset(&mut self) {
        debug!("remise à zéro de l’évaluateur");
        self.memoire.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        Decimal::depuis_texte(s).unwrap()
    }

    fn ok(ev: &mut Evaluateur, s: &str) -> Decimal {
        ev.evaluate(s)
            .unwrap_or_else(|e| panic!("evaluate({s:?}) erreur: {e}"))
    }

    #[test]
    fn vide_refuse_avant_tokenisation() {
        let mut ev = Evaluateur::default();
        let e = ev.evaluate("   ").unwrap_err();
        assert_eq!(e.genre, GenreErreur::EmptyExpression);
        assert_eq!(e.position, 0);
        assert!(ev.history().is_empty());
    }

    #[test]
    fn quiet_ne_touche_pas_l_historique() {
        let mut ev = Evaluateur::default();
        assert_eq!(ev.evaluate_quiet("6*7").unwrap(), d("42"));
        assert_eq!(ev.last_answer(), &d("42"));
        assert!(ev.history().is_empty());

        ok(&mut ev, "1+1");
        assert_eq!(ev.history(), vec!["1+1".to_string()]);
    }

    #[test]
    fn erreur_ne_touche_ni_ans_ni_historique() {
        let mut ev = Evaluateur::default();
        ok(&mut ev, "5");
        assert!(ev.evaluate("5/0").is_err());
        assert_eq!(ev.last_answer(), &d("5"));
        assert_eq!(ev.history(), vec!["5".to_string()]);
    }

    #[test]
    fn ans_enchaine() {
        let mut ev = Evaluateur::default();
        assert!(ev.last_answer().is_zero());
        ok(&mut ev, "5");
        assert_eq!(ok(&mut ev, "ans*2"), d("10"));
        assert_eq!(ok(&mut ev, "ans k"), d("10000"));
    }

    #[test]
    fn variables_par_expression() {
        let mut ev = Evaluateur::default();
        assert_eq!(ev.set_variable_expr("x", "10*5").unwrap(), d("50"));
        assert_eq!(ok(&mut ev, "x+5"), d("55"));
        assert_eq!(ev.history(), vec!["10*5".to_string(), "x+5".to_string()]);

        ev.set_variable("Marge", d("0.15"));
        assert_eq!(ok(&mut ev, "100 * $marge"), d("15"));
    }

    #[test]
    fn precision_configuree_au_dela_du_plancher() {
        let mut ev = Evaluateur::new(ConfigCalc {
            decimal_precision: 70,
            ..ConfigCalc::default()
        });
        let tiers = ok(&mut ev, "1/3");
        assert_eq!(tiers.to_string(), format!("0.{}", "3".repeat(70)));
    }

    #[test]
    fn reset_conserve_la_config() {
        let config = ConfigCalc {
            show_unit_suggestions: false,
            ..ConfigCalc::default()
        };
        let mut ev = Evaluateur::new(config.clone());
        ev.set_variable("a", d("1"));
        ok(&mut ev, "a+1");
        ev.reset();
        assert_eq!(ev.config(), &config);
        assert!(ev.history().is_empty());
        assert_eq!(ev.describe_variables(), "Aucune variable définie");
    }
}
