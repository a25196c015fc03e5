// src/noyau/erreur.rs
//
// Erreurs du noyau : toutes récupérables, toutes positionnées.
// La position est un index de caractère dans l’entrée (pour le surlignage UI).

use thiserror::Error;

/// Taxonomie des erreurs d’évaluation.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GenreErreur {
    #[error("expression vide")]
    EmptyExpression,
    #[error("nombre invalide")]
    InvalidNumber,
    #[error("caractère inattendu : '{0}'")]
    UnexpectedCharacter(char),
    #[error("expression inachevée")]
    UnfinishedExpression,
    #[error("division par zéro")]
    DivisionByZero,
    #[error("modulo par zéro")]
    ModuloByZero,
    #[error("exposant trop grand (maximum 1000)")]
    ExponentTooLarge,
    #[error("puissance invalide : exposant non entier")]
    NegativePower,
    #[error("variable non définie : {0}")]
    UndefinedVariable(String),
    #[error("parenthèse attendue après {0}")]
    ExpectedParenthesis(String),
    #[error("parenthèse fermante attendue")]
    ExpectedClosingParen,
    #[error("parenthèse non fermée")]
    UnmatchedParenthesis,
    #[error("jeton inattendu : {0}")]
    UnexpectedToken(String),
    #[error("fin d’expression inattendue")]
    UnexpectedEnd,
    #[error("racine carrée d’un nombre négatif")]
    NegativeSqrt,
    #[error("fonction inconnue : {0}")]
    UnknownFunction(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{genre} (position {position})")]
pub struct ErreurCalc {
    pub genre: GenreErreur,
    pub position: usize,
}

impl ErreurCalc {
    pub fn new(genre: GenreErreur, position: usize) -> Self {
        Self { genre, position }
    }

    /// Message seul (sans position), pour l’affichage en ligne.
    pub fn message(&self) -> String {
        self.genre.to_string()
    }
}
