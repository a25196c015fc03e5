// src/noyau/format.rs
//
// Affichage des résultats
// -----------------------
// - format_grouped : "1,234,567.5" (séparateurs de milliers, <= 10 décimales)
// - format_with_unit_suggestion : "50,000,000 (50m)", "128 (2 stacks)", "1,728 (1 shulker)"
// - clean_input : retire les caractères de format Unicode (\p{Cf}) + espaces autour

use std::sync::OnceLock;

use regex::Regex;

use super::decimal::{Arrondi, Decimal};

/// Décimales affichées au maximum.
const DECIMALES_MAX: u32 = 10;

/// Conteneurs reconnus à l’unité près (prioritaires sur tout le reste).
const CONTENEURS: [(u64, &str); 3] = [
    (2880, "1 ender chest"),
    (3456, "1 double chest"),
    (1728, "1 shulker"),
];

/// Suggestions par ordre de grandeur (ordre = priorité).
const GRANDEURS: [(u64, &str); 4] = [
    (1_000_000_000_000, "t"),
    (1_000_000_000, "b"),
    (1_000_000, "m"),
    (1_000, "k"),
];

const STACK: u64 = 64;
const STACKS_LIMITE: u64 = 10_000;

/* ------------------------ Groupage ------------------------ */

fn grouper_milliers(entier: &str) -> String {
    let n = entier.len();
    let mut out = String::with_capacity(n + n / 3);
    for (i, c) in entier.chars().enumerate() {
        if i > 0 && (n - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Valeur avec séparateurs de milliers, zéros finaux retirés, 10 décimales max
/// (arrondi au pair, comme un DecimalFormat "#,##0.##########").
pub fn format_grouped(valeur: &Decimal) -> String {
    let v = if valeur.echelle() > DECIMALES_MAX {
        valeur.avec_echelle(DECIMALES_MAX, Arrondi::DemiPair)
    } else {
        valeur.clone()
    }
    .sans_zeros();

    let texte = v.to_string();
    let (signe, corps) = match texte.strip_prefix('-') {
        Some(reste) => ("-", reste),
        None => ("", texte.as_str()),
    };

    match corps.split_once('.') {
        Some((ent, frac)) => format!("{signe}{}.{frac}", grouper_milliers(ent)),
        None => format!("{signe}{}", grouper_milliers(corps)),
    }
}

/* ------------------------ Suggestions d’unités ------------------------ */

/// Suggestion “jeu” pour une valeur, par priorité :
/// conteneur exact > t/b/m/k > stacks (64..10000) > rien.
pub fn suggest_unit(valeur: &Decimal) -> Option<String> {
    let abs = valeur.abs();

    for (taille, nom) in CONTENEURS {
        if abs == Decimal::from(taille) {
            return Some(nom.to_string());
        }
    }

    // quotient arrondi à 2 décimales : toujours “propre” une fois les zéros retirés
    for (multiple, lettre) in GRANDEURS {
        let m = Decimal::from(multiple);
        if abs >= m {
            let q = valeur.diviser_echelle(&m, 2, Arrondi::DemiHaut)?.sans_zeros();
            return Some(format!("{q}{lettre}"));
        }
    }

    let stack = Decimal::from(STACK);
    if abs >= stack && abs < Decimal::from(STACKS_LIMITE) {
        let stacks = valeur
            .diviser_echelle(&stack, DECIMALES_MAX, Arrondi::DemiHaut)?
            .sans_zeros();

        return match stacks.echelle() {
            0 if stacks.vers_i64() == Some(1) => Some("1 stack".to_string()),
            0..=2 => Some(format!("{stacks} stacks")),
            _ => None,
        };
    }

    None
}

/// Rendu groupé + suggestion entre parenthèses (si une suggestion existe).
pub fn format_with_unit_suggestion(valeur: &Decimal) -> String {
    let base = format_grouped(valeur);
    match suggest_unit(valeur) {
        Some(s) => format!("{base} ({s})"),
        None => base,
    }
}

/* ------------------------ Nettoyage d’entrée ------------------------ */

static FORMAT_CF: OnceLock<Regex> = OnceLock::new();

/// Retire les caractères de format invisibles (ZWSP, BOM, …) puis les espaces autour.
pub fn clean_input(brut: &str) -> String {
    let re = FORMAT_CF.get_or_init(|| Regex::new(r"\p{Cf}").expect("regex \\p{Cf}"));
    re.replace_all(brut, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        Decimal::depuis_texte(s).unwrap()
    }

    #[test]
    fn groupage() {
        assert_eq!(format_grouped(&d("0")), "0");
        assert_eq!(format_grouped(&d("999")), "999");
        assert_eq!(format_grouped(&d("1000")), "1,000");
        assert_eq!(format_grouped(&d("-1234567.500")), "-1,234,567.5");
        assert_eq!(format_grouped(&d("123456.000")), "123,456");
    }

    #[test]
    fn dix_decimales_au_plus() {
        assert_eq!(format_grouped(&d("0.333333333333333")), "0.3333333333");
        assert_eq!(format_grouped(&d("0.66666666666666")), "0.6666666667");
        // arrondi au pair sur l’égalité
        assert_eq!(format_grouped(&d("0.00000000025")), "0.0000000002");
        assert_eq!(format_grouped(&d("-0.00000000001")), "0");
    }

    #[test]
    fn groupage_idempotent() {
        let v = d("98765432.123456789012");
        let une = format_grouped(&v);
        assert_eq!(une, "98,765,432.123456789");
        assert_eq!(format_grouped(&v), une);
    }

    #[test]
    fn suggestions_grandeurs() {
        assert_eq!(format_with_unit_suggestion(&d("50000000")), "50,000,000 (50m)");
        assert_eq!(format_with_unit_suggestion(&d("1500")), "1,500 (1.5k)");
        assert_eq!(format_with_unit_suggestion(&d("1234567")), "1,234,567 (1.23m)");
        assert_eq!(format_with_unit_suggestion(&d("-2000000000")), "-2,000,000,000 (-2b)");
        assert_eq!(format_with_unit_suggestion(&d("3000000000000")), "3,000,000,000,000 (3t)");
    }

    #[test]
    fn suggestions_conteneurs() {
        assert_eq!(format_with_unit_suggestion(&d("1728")), "1,728 (1 shulker)");
        assert_eq!(format_with_unit_suggestion(&d("3456")), "3,456 (1 double chest)");
        assert_eq!(format_with_unit_suggestion(&d("2880")), "2,880 (1 ender chest)");
    }

    #[test]
    fn suggestions_stacks() {
        assert_eq!(format_with_unit_suggestion(&d("64")), "64 (1 stack)");
        assert_eq!(format_with_unit_suggestion(&d("128")), "128 (2 stacks)");
        assert_eq!(format_with_unit_suggestion(&d("96")), "96 (1.5 stacks)");
        // 100/64 = 1.5625 : pas propre à 2 décimales
        assert_eq!(format_with_unit_suggestion(&d("100")), "100");
        assert_eq!(format_with_unit_suggestion(&d("12")), "12");
    }

    #[test]
    fn nettoyage() {
        assert_eq!(clean_input("  5k\u{200B} + 2\u{FEFF} "), "5k + 2");
        assert_eq!(clean_input("\u{200E}"), "");
    }
}
