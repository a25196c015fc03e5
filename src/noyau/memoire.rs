// src/noyau/memoire.rs
//
// Mémoire de l’évaluateur : variables, historique borné, dernière réponse (`ans`).
//
// Contrats :
// - clés de variables insensibles à la casse (stockées en minuscules)
// - historique : FIFO de 15 entrées, pas de doublon IMMÉDIAT (les répétitions
//   plus anciennes restent)

use std::collections::{BTreeMap, VecDeque};

use tracing::debug;

use super::decimal::Decimal;
use super::format::format_grouped;

/// Capacité fixe de l’historique (non configurable).
pub const MAX_HISTORIQUE: usize = 15;

#[derive(Clone, Debug, Default)]
pub struct Memoire {
    // BTreeMap : listing trié sans effort
    variables: BTreeMap<String, Decimal>,
    historique: VecDeque<String>,
    ans: Decimal,
}

/// Nom utilisable dans une expression : lettre ou `_`, puis lettres, chiffres, `_`.
/// Le `$` initial est facultatif.
pub fn nom_valide(nom: &str) -> bool {
    let n = nom.strip_prefix('$').unwrap_or(nom);
    let mut chars = n.chars();
    matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// `$Prix` et `prix` désignent la même variable.
fn cle(nom: &str) -> String {
    nom.trim().trim_start_matches('$').to_lowercase()
}

impl Memoire {
    pub fn variable(&self, nom: &str) -> Option<&Decimal> {
        self.variables.get(&cle(nom))
    }

    pub fn set_variable(&mut self, nom: &str, valeur: Decimal) {
        let cle = cle(nom);
        debug!(variable = %cle, valeur = %valeur, "affectation");
        self.variables.insert(cle, valeur);
    }

    pub fn last_answer(&self) -> &Decimal {
        &self.ans
    }

    pub fn set_last_answer(&mut self, valeur: Decimal) {
        self.ans = valeur;
    }

    /// Ajoute `expr` sauf si c’est déjà la dernière entrée ; évince les plus anciennes.
    pub fn record(&mut self, expr: &str) {
        if self.historique.back().is_some_and(|dernier| dernier == expr) {
            return;
        }

        self.historique.push_back(expr.to_string());
        while self.historique.len() > MAX_HISTORIQUE {
            if let Some(evincee) = self.historique.pop_front() {
                debug!(entree = %evincee, "historique plein, éviction");
            }
        }
    }

    /// Historique, du plus ancien au plus récent.
    pub fn history(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.historique.iter().map(String::as_str)
    }

    pub fn clear_history(&mut self) {
        self.historique.clear();
    }

    /// Remise à zéro totale (variables + historique + ans).
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Listing stable (ordre alphabétique) des variables personnalisées.
    pub fn describe_variables(&self) -> String {
        if self.variables.is_empty() {
            return "Aucune variable définie".to_string();
        }

        let mut out = format!("Variables ({}) :", self.variables.len());
        for (nom, valeur) in &self.variables {
            out.push_str(&format!("\n  ${nom} = {}", format_grouped(valeur)));
        }
        out
    }
}
