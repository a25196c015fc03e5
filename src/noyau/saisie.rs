// src/noyau/saisie.rs
//
// Saisie en direct (barre de recherche de l’hôte)
// -----------------------------------------------
// - détecte si une saisie “ressemble” à un calcul (sinon : recherche d’objet normale)
// - n’évalue que les expressions complètes (pas d’opérateur final, parenthèses
//   équilibrées, pas d’appel de fonction ouvert)
// - évaluation silencieuse : jamais d’erreur affichée, jamais d’historique
// - navigation dans l’historique (Ctrl+Z / Ctrl+Y côté hôte)
//
// L’hôte n’est vu qu’à travers `ChampTexte` (lire / écrire le texte du champ).

use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, trace};

use super::eval::Evaluateur;
use super::format::{clean_input, format_grouped};

/// Frontière avec l’hôte : le champ de saisie.
pub trait ChampTexte {
    fn texte(&self) -> String;
    fn set_texte(&mut self, texte: &str);
}

/* ------------------------ Motifs ------------------------ */

struct Motifs {
    operateur: Regex,
    unite: Regex,
    unite_stockage: Regex,
    fonction: Regex,
    variable: Regex,
    parenthese: Regex,
    nombre_seul: Regex,
    operateur_final: Regex,
    fonction_ouverte: Regex,
    objet: Regex,
}

static MOTIFS: OnceLock<Motifs> = OnceLock::new();

fn motifs() -> &'static Motifs {
    MOTIFS.get_or_init(|| {
        let re = |m: &str| Regex::new(m).expect("motif de saisie");
        Motifs {
            operateur: re(r"[+\-*/^%]"),
            unite: re(r"(?i)\d+\s*[kmbtseh](?:\s|$|[+\-*/^%()])"),
            unite_stockage: re(r"(?i)\d+\s*(?:sc|dc|eb)(?:\s|$|[+\-*/^%()])"),
            fonction: re(r"(?i)(?:sqrt|abs|floor|ceil|round)\s*\("),
            variable: re(r"(?i)(?:ans|\$\w+)"),
            parenthese: re(r"[()]"),
            nombre_seul: re(r"^\s*\d+\.?\d*\s*$"),
            operateur_final: re(r"[+\-*/^%]\s*$"),
            fonction_ouverte: re(r"(?i)(?:sqrt|abs|floor|ceil|round)\s*\([^)]*$"),
            // recherches d’objets courantes : pas un calcul sans opérateur
            objet: re(concat!(
                r"(?i)(?:sword|pickaxe|axe|shovel|hoe|helmet|chestplate|leggings|boots|",
                r"diamond|iron|gold|stone|wood|bow|arrow|block|ore|ingot|coal|redstone|",
                r"lapis|emerald|netherite|pearl|eye|blaze|slime|magma|prismarine|quartz|",
                r"obsidian|glowstone|hopper|chest|furnace|crafting|enchant|potion|book|bed)"
            )),
        }
    })
}

/// Heuristique : la saisie est-elle un calcul (et non une recherche d’objet) ?
pub fn looks_like_calculation(saisie: &str) -> bool {
    let s = saisie.trim();
    if s.is_empty() {
        return false;
    }

    let m = motifs();

    // un nombre seul n’est pas un calcul
    if m.nombre_seul.is_match(s) {
        return false;
    }

    let a_operateur = m.operateur.is_match(s);
    if m.objet.is_match(s) && !a_operateur {
        return false;
    }

    a_operateur
        || m.parenthese.is_match(s)
        || m.fonction.is_match(s)
        || m.variable.is_match(s)
        || m.unite.is_match(s)
        || m.unite_stockage.is_match(s)
}

/// Pré-contrôle “saisie terminée” : évite d’évaluer (et d’afficher) des fragments.
pub fn is_expression_complete(saisie: &str) -> bool {
    let s = saisie.trim();
    if s.is_empty() {
        return false;
    }

    let m = motifs();
    if m.operateur_final.is_match(s) {
        return false;
    }

    let mut profondeur: i64 = 0;
    for c in s.chars() {
        match c {
            '(' => profondeur += 1,
            ')' => profondeur -= 1,
            _ => {}
        }
        // fermante avant ouvrante
        if profondeur < 0 {
            return false;
        }
    }
    if profondeur != 0 {
        return false;
    }

    !m.fonction_ouverte.is_match(s)
}

/* ------------------------ État de saisie ------------------------ */

#[derive(Clone, Debug, Default)]
pub struct SaisieLive {
    derniere_saisie: String,
    dernier_resultat: Option<String>,
    // None = pas en navigation ; Some(i) = entrée i de l’historique affichée
    index_historique: Option<usize>,
}

impl SaisieLive {
    /// À appeler à chaque changement du champ. Rend la saisie nettoyée.
    pub fn synchroniser(&mut self, champ: &impl ChampTexte, eval: &mut Evaluateur) -> String {
        let propre = clean_input(&champ.texte());
        if propre == self.derniere_saisie {
            return propre;
        }

        // nouvelle saisie : on sort de la navigation
        self.index_historique = None;
        self.derniere_saisie = propre.clone();
        self.calculer_affichage(eval);
        propre
    }

    fn calculer_affichage(&mut self, eval: &mut Evaluateur) {
        let s = self.derniere_saisie.as_str();

        if !looks_like_calculation(s) || !is_expression_complete(s) {
            self.dernier_resultat = None;
            return;
        }

        // erreurs avalées : en direct, on n’affiche rien plutôt qu’une faute de frappe
        self.dernier_resultat = match eval.evaluate_quiet(s) {
            Ok(v) => Some(format_grouped(&v)),
            Err(e) => {
                trace!(saisie = s, erreur = %e, "évaluation directe ignorée");
                None
            }
        };
    }

    pub fn resultat(&self) -> Option<&str> {
        self.dernier_resultat.as_deref()
    }

    pub fn a_resultat(&self) -> bool {
        self.dernier_resultat.is_some()
    }

    /// Recule dans l’historique (plus ancien). Première pression : entrée la plus récente.
    pub fn precedent(&mut self, eval: &mut Evaluateur, champ: &mut impl ChampTexte) {
        let historique = eval.history();
        if !eval.config().history_navigation || historique.is_empty() {
            return;
        }

        let i = match self.index_historique {
            None => historique.len() - 1,
            Some(i) => i.saturating_sub(1),
        };
        self.afficher_entree(&historique, i, eval, champ);
    }

    /// Avance dans l’historique ; après la plus récente, le champ est vidé.
    pub fn suivant(&mut self, eval: &mut Evaluateur, champ: &mut impl ChampTexte) {
        let historique = eval.history();
        if !eval.config().history_navigation || historique.is_empty() {
            return;
        }

        match self.index_historique {
            Some(i) if i + 1 < historique.len() => {
                self.afficher_entree(&historique, i + 1, eval, champ);
            }
            Some(_) => {
                self.index_historique = None;
                self.derniere_saisie.clear();
                self.dernier_resultat = None;
                champ.set_texte("");
            }
            None => {}
        }
    }

    fn afficher_entree(
        &mut self,
        historique: &[String],
        i: usize,
        eval: &mut Evaluateur,
        champ: &mut impl ChampTexte,
    ) {
        let Some(entree) = historique.get(i) else {
            return;
        };
        debug!(index = i, entree = %entree, "navigation historique");

        self.index_historique = Some(i);
        champ.set_texte(entree);
        // déjà synchronisé : le prochain `synchroniser` ne doit pas sortir de la navigation
        self.derniere_saisie = clean_input(entree);
        self.calculer_affichage(eval);
    }

    /// Remise à zéro de session (changement de monde / serveur côté hôte).
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
