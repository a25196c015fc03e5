//! Noyau décimal exact (calculatrice à unités)
//!
//! Organisation interne :
//! - decimal.rs   : décimal à précision arbitraire (BigInt + échelle)
//! - erreur.rs    : taxonomie des erreurs (positionnées)
//! - config.rs    : configuration explicite (précision, options d’affichage)
//! - jetons.rs    : tokenisation + table des unités
//! - analyse.rs   : descente récursive (évaluation directe)
//! - memoire.rs   : variables, historique borné, `ans`
//! - eval.rs      : pipeline complet (évaluation silencieuse / validée)
//! - format.rs    : affichage groupé + suggestions d’unités
//! - saisie.rs    : saisie en direct + frontière avec le champ de l’hôte
//! - commandes.rs : commandes texte (console)

pub mod analyse;
pub mod commandes;
pub mod config;
pub mod decimal;
pub mod erreur;
pub mod eval;
pub mod format;
pub mod jetons;
pub mod memoire;
pub mod saisie;

#[cfg(test)]
mod tests_proprietes;

// API publique minimale
pub use config::ConfigCalc;
pub use decimal::Decimal;
pub use erreur::{ErreurCalc, GenreErreur};
pub use eval::Evaluateur;
pub use format::{format_grouped, format_with_unit_suggestion};
pub use saisie::{ChampTexte, SaisieLive};
