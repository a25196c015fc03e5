// src/noyau/jetons.rs
//
// Tokenisation
// ------------
// Supporte:
// - nombres décimaux (12, 1.5, .5, 5.)
// - opérateurs + - * / ^ %, et `x`/`X` comme multiplication (10x5, (2+3)x4, 10kx50k)
// - parenthèses ( )
// - fonctions {sqrt, abs, floor, ceil, round}
// - unités après un nombre (5k, 2h, 1eb)
// - variables (prix, $prix, $maxval) et `ans`
//
// Chaque jeton garde sa position (index de caractère) pour les erreurs.

use std::fmt;

use super::decimal::Decimal;
use super::erreur::{ErreurCalc, GenreErreur};

/// Table des unités (nom en minuscules -> multiplicateur). Immuable.
pub const UNITES: [(&str, u64); 10] = [
    ("k", 1_000),
    ("m", 1_000_000),
    ("b", 1_000_000_000),
    ("t", 1_000_000_000_000),
    ("s", 64),    // stack
    ("e", 160),   // enchanté
    ("h", 1728),  // shulker (27 stacks)
    ("sc", 1728), // petit coffre
    ("dc", 3456), // double coffre
    ("eb", 2880), // ender chest (45 stacks)
];

/// Fonctions unaires reconnues.
pub const FONCTIONS: [&str; 5] = ["sqrt", "abs", "floor", "ceil", "round"];

/// Multiplicateur d’une unité connue.
pub fn multiplicateur(unite: &str) -> Option<Decimal> {
    UNITES
        .iter()
        .find(|(nom, _)| *nom == unite)
        .map(|(_, m)| Decimal::from(*m))
}

fn unite_statique(nom: &str) -> Option<&'static str> {
    UNITES.iter().map(|(n, _)| *n).find(|n| *n == nom)
}

#[derive(Clone, Debug, PartialEq)]
pub enum Tok {
    /// Littéral ou `ans` (texte d’origine conservé pour les messages).
    Num { valeur: Decimal, texte: String },
    Op(char),
    LPar,
    RPar,
    Fonction(String),
    Var(String),
    Unite(&'static str),
    Fin,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Jeton {
    pub tok: Tok,
    pub pos: usize,
}

impl Jeton {
    fn new(tok: Tok, pos: usize) -> Self {
        Self { tok, pos }
    }
}

impl fmt::Display for Tok {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tok::Num { texte, .. } => f.write_str(texte),
            Tok::Op(c) => write!(f, "{c}"),
            Tok::LPar => f.write_str("("),
            Tok::RPar => f.write_str(")"),
            Tok::Fonction(nom) | Tok::Var(nom) => f.write_str(nom),
            Tok::Unite(u) => f.write_str(u),
            Tok::Fin => Ok(()),
        }
    }
}

/// `x` entre deux valeurs = multiplication.
/// Vrai si précédé d’un chiffre, de `)`, ou si le dernier jeton est une unité.
///
/// Exception : un `0` qui ouvre la suite de chiffres ("0x5") ne multiplie pas
/// (réservé, façon hexadécimal). Seul le premier caractère de la suite compte :
/// "10x5" et "010x5" multiplient.
fn x_est_multiplication(chars: &[char], i: usize, out: &[Jeton]) -> bool {
    if i == 0 {
        return false;
    }
    let precedent = chars[i - 1];
    let debut_de_suite = i < 2 || !(chars[i - 2].is_ascii_digit() || chars[i - 2] == '.');
    if precedent == '0' && debut_de_suite {
        return false;
    }

    precedent.is_ascii_digit()
        || precedent == ')'
        || matches!(out.last(), Some(Jeton { tok: Tok::Unite(_), .. }))
}

/// Classe un identifiant déjà mis en minuscules.
fn classer_identifiant(nom: String, out: &[Jeton], ans: &Decimal) -> Tok {
    if FONCTIONS.contains(&nom.as_str()) {
        return Tok::Fonction(nom);
    }

    // unité seulement juste après un nombre
    if let Some(u) = unite_statique(&nom) {
        if matches!(out.last(), Some(Jeton { tok: Tok::Num { .. }, .. })) {
            return Tok::Unite(u);
        }
        return Tok::Var(nom);
    }

    if nom == "ans" {
        return Tok::Num {
            valeur: ans.clone(),
            texte: nom,
        };
    }

    Tok::Var(nom)
}

/// Tokenize une chaîne en jetons (terminés par `Tok::Fin`).
/// `ans` est résolu ici, avec la dernière réponse courante.
pub fn tokenize(s: &str, ans: &Decimal) -> Result<Vec<Jeton>, ErreurCalc> {
    let chars: Vec<char> = s.chars().collect();
    let mut out: Vec<Jeton> = Vec::new();
    let mut i: usize = 0;

    while i < chars.len() {
        let c = chars[i];

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        // Nombre : suite maximale de chiffres avec au plus un point
        if c.is_ascii_digit() || c == '.' {
            let start = i;
            let mut point = false;
            while i < chars.len() {
                match chars[i] {
                    d if d.is_ascii_digit() => i += 1,
                    '.' if !point => {
                        point = true;
                        i += 1;
                    }
                    _ => break,
                }
            }

            let texte: String = chars[start..i].iter().collect();
            let valeur = Decimal::depuis_texte(&texte)
                .ok_or_else(|| ErreurCalc::new(GenreErreur::InvalidNumber, start))?;
            out.push(Jeton::new(Tok::Num { valeur, texte }, start));
            continue;
        }

        // Opérateurs
        if matches!(c, '+' | '-' | '*' | '/' | '^' | '%') {
            out.push(Jeton::new(Tok::Op(c), i));
            i += 1;
            continue;
        }

        if (c == 'x' || c == 'X') && x_est_multiplication(&chars, i, &out) {
            out.push(Jeton::new(Tok::Op('*'), i));
            i += 1;
            continue;
        }
        // sinon : `x` commence un identifiant (plus bas)

        // Parenthèses
        if c == '(' {
            out.push(Jeton::new(Tok::LPar, i));
            i += 1;
            continue;
        }
        if c == ')' {
            out.push(Jeton::new(Tok::RPar, i));
            i += 1;
            continue;
        }

        // Identifiants : fonctions, unités, variables, ans
        if c == '$' || c.is_alphabetic() {
            let start = i;
            let syntaxe_variable = c == '$';
            if syntaxe_variable {
                i += 1;
            }

            let mut nom = String::new();
            while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                let courant = chars[i];

                // "10bx50k" == "10b*50k" : un `x` coupe le nom,
                // sauf dans un nom `$...` où c’est une lettre ordinaire.
                if (courant == 'x' || courant == 'X') && !nom.is_empty() && !syntaxe_variable {
                    break;
                }

                nom.push(courant);
                i += 1;
            }

            let tok = classer_identifiant(nom.to_lowercase(), &out, ans);
            out.push(Jeton::new(tok, start));
            continue;
        }

        return Err(ErreurCalc::new(GenreErreur::UnexpectedCharacter(c), i));
    }

    out.push(Jeton::new(Tok::Fin, chars.len()));
    Ok(out)
}

/// Format utilitaire (debug/traces) : liste de jetons en texte.
pub fn format_tokens(jetons: &[Jeton]) -> String {
    jetons
        .iter()
        .filter(|j| j.tok != Tok::Fin)
        .map(|j| match &j.tok {
            Tok::Unite(u) => format!("[{u}]"),
            Tok::Var(nom) => format!("${nom}"),
            autre => autre.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
