//! Campagne de propriétés : exactitude, plancher de précision, unités, `x`,
//! affichage, historique borné, positions d’erreur, suggestions, variables.
//!
//! Chaque test part d’un évaluateur neuf (config par défaut sauf mention).

use super::config::ConfigCalc;
use super::decimal::Decimal;
use super::erreur::GenreErreur;
use super::eval::Evaluateur;
use super::format::{format_grouped, format_with_unit_suggestion};

fn d(s: &str) -> Decimal {
    Decimal::depuis_texte(s).unwrap_or_else(|| panic!("littéral invalide: {s:?}"))
}

fn eval_ok(ev: &mut Evaluateur, expr: &str) -> Decimal {
    ev.evaluate(expr)
        .unwrap_or_else(|e| panic!("expr={expr:?} err={e}"))
}

fn assert_eval(expr: &str, attendu: &str) {
    let mut ev = Evaluateur::default();
    assert_eq!(eval_ok(&mut ev, expr), d(attendu), "expr={expr:?}");
}

fn assert_err(expr: &str, genre: GenreErreur, position: Option<usize>) {
    let mut ev = Evaluateur::default();
    let e = ev
        .evaluate(expr)
        .expect_err(&format!("expr={expr:?} devait échouer"));
    assert_eq!(e.genre, genre, "expr={expr:?}");
    if let Some(p) = position {
        assert_eq!(e.position, p, "expr={expr:?}");
    }
}

/* ------------------------ Exactitude ------------------------ */

#[test]
fn grands_entiers_exacts() {
    let a = "123456789012345678901234567890";
    let b = "987654321098765432109876543210";
    assert_eval(&format!("{a}+{b}"), "1111111110111111111011111111100");
    assert_eval(&format!("{a}-{b}"), "-864197532086419753208641975320");
    assert_eval(
        &format!("{a}*{b}"),
        "121932631137021795226185032733622923332237463801111263526900",
    );
    assert_eval(
        "1000000000000000000000000000001*999999999999999999999999999999",
        "999999999999999999999999999999999999999999999999999999999999",
    );
}

#[test]
fn decimaux_sans_erreur_binaire() {
    assert_eval("0.1+0.2", "0.3");
    assert_eval("1.1*1.1", "1.21");
    assert_eval("10.5%3", "1.5");
    assert_eval("-7%3", "-1");
}

/* ------------------------ Plancher de précision ------------------------ */

#[test]
fn un_tiers_au_moins_50_chiffres() {
    let mut ev = Evaluateur::new(ConfigCalc {
        decimal_precision: 10,
        ..ConfigCalc::default()
    });
    let tiers = eval_ok(&mut ev, "1/3");
    let texte = tiers.to_string();
    let chiffres = texte.trim_start_matches("0.");
    assert!(chiffres.len() >= 50, "{texte}");
    assert!(chiffres.chars().all(|c| c == '3'), "{texte}");

    // l’affichage reste à 10 décimales
    assert_eq!(format_grouped(&tiers), "0.3333333333");
}

#[test]
fn precision_configuree_au_dela_de_1000() {
    let mut ev = Evaluateur::new(ConfigCalc {
        decimal_precision: 1500,
        ..ConfigCalc::default()
    });
    let texte = eval_ok(&mut ev, "1/3").to_string();
    assert_eq!(texte, format!("0.{}", "3".repeat(1500)));
}

#[test]
fn puissances_en_chaine_erreur_typee() {
    let mut ev = Evaluateur::default();
    let e = ev
        .evaluate_quiet("(((0.1^1000)^1000)^1000)^5")
        .unwrap_err();
    assert_eq!(e.genre, GenreErreur::NegativePower);
}

#[test]
fn deux_tiers_arrondi_demi_haut() {
    let mut ev = Evaluateur::default();
    let v = eval_ok(&mut ev, "2/3");
    assert_eq!(v.to_string(), format!("0.{}7", "6".repeat(49)));
}

/* ------------------------ Unités ------------------------ */

#[test]
fn multiplication_par_unite() {
    assert_eval("5k", "5000");
    assert_eval("2h", "3456");
    assert_eval("1eb", "2880");
    assert_eval("3s", "192");
    assert_eval("1.5m", "1500000");
    assert_eval("2dc + 1sc", "8640");
    assert_eval("2K", "2000");
}

/* ------------------------ `x` ambigu ------------------------ */

#[test]
fn x_multiplication() {
    assert_eval("10x5", "50");
    assert_eval("(2+3)x4", "20");
    assert_eval("10kx50k", "500000000");
    assert_eval("3X3", "9");
}

#[test]
fn x_seul_est_une_variable() {
    let mut ev = Evaluateur::default();
    ev.set_variable("x", d("7"));
    assert_eq!(eval_ok(&mut ev, "x"), d("7"));
    assert_eq!(eval_ok(&mut ev, "x+1"), d("8"));
    assert_eq!(eval_ok(&mut ev, "2*x"), d("14"));
}

#[test]
fn x_non_defini() {
    assert_err("x", GenreErreur::UndefinedVariable("x".into()), Some(0));
}

/* ------------------------ Affichage ------------------------ */

#[test]
fn affichage_idempotent() {
    for s in ["0", "-0.5", "1234567.891", "0.12345678905", "98765432109876543210.1"] {
        let v = d(s);
        let une = format_grouped(&v);
        assert_eq!(format_grouped(&v), une, "{s}");
    }
}

/* ------------------------ Historique ------------------------ */

#[test]
fn historique_quinze_plus_recents() {
    let mut ev = Evaluateur::default();
    let exprs: Vec<String> = (1..=20).map(|i| format!("{i}+{i}")).collect();
    for e in &exprs {
        eval_ok(&mut ev, e);
    }
    let h = ev.history();
    assert_eq!(h.len(), 15);
    assert_eq!(h, exprs[5..].to_vec());
}

/* ------------------------ Positions d’erreur ------------------------ */

#[test]
fn erreurs_positionnees() {
    assert_err("5+", GenreErreur::UnfinishedExpression, Some(1));
    assert_err("5/0", GenreErreur::DivisionByZero, Some(1));
    assert_err("5%0", GenreErreur::ModuloByZero, Some(1));
    assert_err("sqrt(-4)", GenreErreur::NegativeSqrt, None);
    assert_err("", GenreErreur::EmptyExpression, Some(0));
    assert_err("2^1001", GenreErreur::ExponentTooLarge, Some(1));
    assert_err("sqrt 4", GenreErreur::ExpectedParenthesis("sqrt".into()), None);
    assert_err("5 # 3", GenreErreur::UnexpectedCharacter('#'), Some(2));
}

/* ------------------------ Suggestions ------------------------ */

#[test]
fn suggestions_d_unites() {
    assert_eq!(format_with_unit_suggestion(&d("50000000")), "50,000,000 (50m)");
    assert!(format_with_unit_suggestion(&d("128")).contains("2 stacks"));
    assert_eq!(format_with_unit_suggestion(&d("1728")), "1,728 (1 shulker)");
}

/* ------------------------ Variables ------------------------ */

#[test]
fn variables_et_ans() {
    let mut ev = Evaluateur::default();
    ev.set_variable_expr("x", "10*5").unwrap();
    assert_eq!(eval_ok(&mut ev, "x+5"), d("55"));

    eval_ok(&mut ev, "5");
    assert_eq!(eval_ok(&mut ev, "ans*2"), d("10"));
}
