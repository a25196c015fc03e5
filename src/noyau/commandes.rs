// src/noyau/commandes.rs
//
// Commandes “chat” de l’hôte (console native, `--eval`)
// ----------------------------------------------------
//   calc <expr>          calcul validé (historisé)
//   calchist             historique numéroté (10 dernières entrées)
//   calcclear            efface l’historique
//   calcset <var> <expr> affectation
//   calcvars             liste des variables
//   calchelp [page]      aide
//   calcconfig           configuration courante
//
// Chaque commande rend des lignes de texte ; l’affichage est à la charge de l’hôte.
// Le `/` initial est facultatif ; une ligne sans commande est un `calc`.

use tracing::debug;

use super::decimal::Decimal;
use super::eval::Evaluateur;
use super::format::{clean_input, format_grouped, format_with_unit_suggestion};
use super::memoire::nom_valide;

/// Entrées listées par `calchist`.
const HIST_AFFICHEES: usize = 10;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Commande {
    Calc(String),
    Hist,
    Clear,
    Set { nom: String, expr: String },
    Vars,
    Help(Option<usize>),
    Config,
    Inconnue(String),
}

const PAGES_AIDE: [&[&str]; 4] = [
    &[
        "Opérateurs : + - * / ^ %",
        "  x entre deux termes = multiplication (10x5, (2+3)x4)",
        "  parenthèses pour grouper : (1+2)*3",
    ],
    &[
        "Fonctions : sqrt(x) abs(x) floor(x) ceil(x) round(x)",
        "  round : arrondi à l’entier, moitié vers le haut",
    ],
    &[
        "Unités (après un nombre) :",
        "  k=1,000  m=1,000,000  b=1,000,000,000  t=1,000,000,000,000",
        "  s=64 (stack)  e=160  h=1,728 (shulker)",
        "  sc=1,728  dc=3,456  eb=2,880 (ender chest)",
    ],
    &[
        "Variables :",
        "  calcset prix 2.5k   puis   calc prix*3",
        "  $prix fonctionne aussi ; ans = dernier résultat",
        "  calcvars pour la liste, calchist pour l’historique",
    ],
];

impl Commande {
    pub fn parse(ligne: &str) -> Self {
        let ligne = clean_input(ligne);
        let ligne = ligne.strip_prefix('/').unwrap_or(ligne.as_str());

        let (tete, reste) = match ligne.split_once(char::is_whitespace) {
            Some((t, r)) => (t, r.trim()),
            None => (ligne, ""),
        };

        match tete.to_lowercase().as_str() {
            "calc" => Commande::Calc(reste.to_string()),
            "calchist" => Commande::Hist,
            "calcclear" => Commande::Clear,
            "calcvars" => Commande::Vars,
            "calcconfig" => Commande::Config,
            "calchelp" => Commande::Help(reste.parse::<usize>().ok()),
            "calcset" => match reste.split_once(char::is_whitespace) {
                Some((nom, expr)) => Commande::Set {
                    nom: nom.to_string(),
                    expr: expr.trim().to_string(),
                },
                None => Commande::Set {
                    nom: reste.to_string(),
                    expr: String::new(),
                },
            },
            t if t.starts_with("calc") => Commande::Inconnue(tete.to_string()),
            _ => Commande::Calc(ligne.to_string()),
        }
    }
}

fn rendu(eval: &Evaluateur, valeur: &Decimal) -> String {
    if eval.config().show_unit_suggestions {
        format_with_unit_suggestion(valeur)
    } else {
        format_grouped(valeur)
    }
}

/// Exécute une ligne de commande et rend les lignes de réponse.
pub fn executer(ligne: &str, eval: &mut Evaluateur) -> Vec<String> {
    let commande = Commande::parse(ligne);
    debug!(?commande, "commande");

    match commande {
        Commande::Calc(expr) => match eval.evaluate(&expr) {
            Ok(v) => vec![format!("{expr} = {}", rendu(eval, &v))],
            Err(e) => vec![format!("Erreur : {e}")],
        },

        Commande::Hist => {
            let historique = eval.history();
            if historique.is_empty() {
                return vec!["Historique vide".to_string()];
            }
            let total = historique.len();
            let debut = total.saturating_sub(HIST_AFFICHEES);
            let mut out: Vec<String> = historique
                .iter()
                .enumerate()
                .skip(debut)
                .map(|(i, e)| format!("{}. {e}", i + 1))
                .collect();
            if debut > 0 {
                out.push(format!("({} affichées sur {total})", total - debut));
            }
            out
        }

        Commande::Clear => {
            eval.clear_history();
            vec!["Historique effacé".to_string()]
        }

        Commande::Set { nom, expr } => {
            if !nom_valide(&nom) || expr.is_empty() {
                return vec!["Usage : calcset <variable> <expression>".to_string()];
            }
            match eval.set_variable_expr(&nom, &expr) {
                Ok(v) => {
                    let nom = nom.trim_start_matches('$').to_lowercase();
                    vec![format!("${nom} = {}", rendu(eval, &v))]
                }
                Err(e) => vec![format!("Erreur : {e}")],
            }
        }

        Commande::Vars => eval.describe_variables().lines().map(str::to_string).collect(),

        Commande::Help(page) => {
            let n = PAGES_AIDE.len();
            let p = page.unwrap_or(1).clamp(1, n);
            let mut out = vec![format!("Aide calculatrice ({p}/{n})")];
            out.extend(PAGES_AIDE[p - 1].iter().map(|l| l.to_string()));
            if p < n {
                out.push(format!("calchelp {} pour la suite", p + 1));
            }
            out
        }

        Commande::Config => {
            let c = eval.config();
            vec![
                format!("Précision : {} décimales", c.decimal_precision),
                format!("Suggestions d’unités : {}", oui_non(c.show_unit_suggestions)),
                format!("Navigation historique : {}", oui_non(c.history_navigation)),
                format!("Résultats en direct : {}", oui_non(c.inline_results)),
            ]
        }

        Commande::Inconnue(nom) => vec![format!("Commande inconnue : {nom} (calchelp)")],
    }
}

fn oui_non(b: bool) -> &'static str {
    if b {
        "oui"
    } else {
        "non"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noyau::config::ConfigCalc;

    #[test]
    fn analyse_des_lignes() {
        assert_eq!(Commande::parse("/calc 2+2"), Commande::Calc("2+2".into()));
        assert_eq!(Commande::parse("5k * 3"), Commande::Calc("5k * 3".into()));
        assert_eq!(Commande::parse("CALCHIST"), Commande::Hist);
        assert_eq!(Commande::parse("calchelp 3"), Commande::Help(Some(3)));
        assert_eq!(Commande::parse("calchelp"), Commande::Help(None));
        assert_eq!(
            Commande::parse("calcset prix 2.5k * 2"),
            Commande::Set {
                nom: "prix".into(),
                expr: "2.5k * 2".into()
            }
        );
        assert_eq!(Commande::parse("calcfoo"), Commande::Inconnue("calcfoo".into()));
    }

    #[test]
    fn calc_avec_suggestion() {
        let mut ev = Evaluateur::default();
        assert_eq!(executer("calc 50m", &mut ev), vec!["50m = 50,000,000 (50m)"]);
        assert_eq!(executer("calc 2s", &mut ev), vec!["2s = 128 (2 stacks)"]);
        assert_eq!(
            executer("calc 1/0", &mut ev),
            vec!["Erreur : division par zéro (position 1)"]
        );
    }

    #[test]
    fn calc_sans_suggestion() {
        let mut ev = Evaluateur::new(ConfigCalc {
            show_unit_suggestions: false,
            ..ConfigCalc::default()
        });
        assert_eq!(executer("calc 50m", &mut ev), vec!["50m = 50,000,000"]);
    }

    #[test]
    fn historique_et_effacement() {
        let mut ev = Evaluateur::default();
        assert_eq!(executer("calchist", &mut ev), vec!["Historique vide"]);
        executer("1+1", &mut ev);
        executer("2*3", &mut ev);
        assert_eq!(executer("calchist", &mut ev), vec!["1. 1+1", "2. 2*3"]);
        executer("calcclear", &mut ev);
        assert_eq!(executer("calchist", &mut ev), vec!["Historique vide"]);
    }

    #[test]
    fn historique_limite_aux_dix_dernieres() {
        let mut ev = Evaluateur::default();
        for i in 1..=12 {
            executer(&format!("calc {i}+0"), &mut ev);
        }
        let lignes = executer("calchist", &mut ev);
        assert_eq!(lignes.len(), 11);
        assert_eq!(lignes[0], "3. 3+0");
        assert_eq!(lignes[9], "12. 12+0");
        assert_eq!(lignes[10], "(10 affichées sur 12)");
    }

    #[test]
    fn affectation_et_liste() {
        let mut ev = Evaluateur::default();
        assert_eq!(
            executer("calcset $Prix 2.5k", &mut ev),
            vec!["$prix = 2,500 (2.5k)"]
        );
        assert_eq!(executer("calc prix*2", &mut ev), vec!["prix*2 = 5,000 (5k)"]);
        assert_eq!(
            executer("calcvars", &mut ev),
            vec!["Variables (1) :", "  $prix = 2,500"]
        );
        assert_eq!(
            executer("calcset 9x 1", &mut ev),
            vec!["Usage : calcset <variable> <expression>"]
        );
    }

    #[test]
    fn aide_bornee() {
        let mut ev = Evaluateur::default();
        let p1 = executer("calchelp", &mut ev);
        assert_eq!(p1[0], "Aide calculatrice (1/4)");
        assert_eq!(p1.last().map(String::as_str), Some("calchelp 2 pour la suite"));

        let p9 = executer("calchelp 9", &mut ev);
        assert_eq!(p9[0], "Aide calculatrice (4/4)");
    }

    #[test]
    fn config_affichee() {
        let mut ev = Evaluateur::default();
        let lignes = executer("calcconfig", &mut ev);
        assert_eq!(lignes[0], "Précision : 10 décimales");
        assert_eq!(lignes.len(), 4);
    }
}
