// src/noyau/decimal.rs
//
// Décimal en précision arbitraire
// -------------------------------
// valeur = mantisse × 10^(-echelle), echelle >= 0
//
// Contrats :
// - + - × et reste : exacts (aucune perte).
// - ÷ et puissance : arrondis à `precision` chiffres significatifs (demi-haut).
// - Égalité / ordre : par VALEUR (1.50 == 1.5).
// - Échelle bornée par ECHELLE_MAX : un dépassement rend None, jamais de débordement u32.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Neg, Sub};

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

/// Modes d’arrondi utilisés par le noyau et le formateur.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arrondi {
    Plancher,
    Plafond,
    DemiHaut,
    DemiPair,
}

/// Plus grande échelle représentable (celle d’un entier signé 32 bits).
pub const ECHELLE_MAX: u32 = i32::MAX as u32;

#[derive(Clone, Debug, Default)]
pub struct Decimal {
    mantisse: BigInt,
    echelle: u32,
}

/* ------------------------ Helpers entiers ------------------------ */

fn pow10(n: u32) -> BigInt {
    BigInt::from(10).pow(n)
}

fn nb_chiffres(n: &BigInt) -> u32 {
    if n.is_zero() {
        return 1;
    }
    n.magnitude().to_str_radix(10).len() as u32
}

/// num / den arrondi selon `mode` (den != 0).
fn diviser_arrondi(num: &BigInt, den: &BigInt, mode: Arrondi) -> BigInt {
    // division tronquée vers zéro
    let q = num / den;
    let r = num - &q * den;
    if r.is_zero() {
        return q;
    }

    // signe du quotient exact
    let positif = num.is_negative() == den.is_negative();

    let loin_de_zero = match mode {
        Arrondi::Plancher => !positif,
        Arrondi::Plafond => positif,
        Arrondi::DemiHaut | Arrondi::DemiPair => match (r.abs() * 2u32).cmp(&den.abs()) {
            Ordering::Greater => true,
            Ordering::Less => false,
            Ordering::Equal => mode == Arrondi::DemiHaut || !(&q % 2u32).is_zero(),
        },
    };

    match (loin_de_zero, positif) {
        (false, _) => q,
        (true, true) => q + 1u32,
        (true, false) => q - 1u32,
    }
}

impl Decimal {
    fn nouveau(mantisse: BigInt, echelle: u32) -> Self {
        Self { mantisse, echelle }
    }

    /// None si l’échelle dépasse ECHELLE_MAX.
    fn borne(mantisse: BigInt, echelle: u64) -> Option<Self> {
        let echelle = u32::try_from(echelle).ok().filter(|e| *e <= ECHELLE_MAX)?;
        Some(Self::nouveau(mantisse, echelle))
    }

    pub fn zero() -> Self {
        Self::default()
    }

    pub fn un() -> Self {
        Self::nouveau(BigInt::one(), 0)
    }

    /// Lecture d’un littéral décimal : `[-]chiffres[.chiffres]`, ".5" et "5." acceptés.
    pub fn depuis_texte(s: &str) -> Option<Self> {
        let (negatif, corps) = match s.strip_prefix('-') {
            Some(reste) => (true, reste),
            None => (false, s),
        };

        let (ent, frac) = corps.split_once('.').unwrap_or((corps, ""));
        if ent.is_empty() && frac.is_empty() {
            return None;
        }
        if !ent.chars().chain(frac.chars()).all(|c| c.is_ascii_digit()) {
            return None;
        }

        let chiffres = format!("{ent}{frac}");
        let m = BigInt::parse_bytes(chiffres.as_bytes(), 10)?;
        let m = if negatif { -m } else { m };
        Self::borne(m, frac.len() as u64)
    }

    pub fn echelle(&self) -> u32 {
        self.echelle
    }

    pub fn is_zero(&self) -> bool {
        self.mantisse.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.mantisse.is_negative()
    }

    pub fn abs(&self) -> Self {
        Self::nouveau(self.mantisse.abs(), self.echelle)
    }

    fn mantisse_a(&self, echelle: u32) -> BigInt {
        &self.mantisse * pow10(echelle - self.echelle)
    }

    /// Mantisses ramenées à une échelle commune.
    fn aligner(&self, autre: &Self) -> (BigInt, BigInt, u32) {
        let e = self.echelle.max(autre.echelle);
        (self.mantisse_a(e), autre.mantisse_a(e), e)
    }

    /// Reste tronqué (signe du dividende). None si diviseur nul.
    pub fn reste(&self, diviseur: &Self) -> Option<Self> {
        if diviseur.is_zero() {
            return None;
        }
        let (a, b, e) = self.aligner(diviseur);
        Some(Self::nouveau(a % b, e))
    }

    /// Produit exact. None si l’échelle du résultat dépasse ECHELLE_MAX.
    pub fn produit(&self, autre: &Self) -> Option<Self> {
        Self::borne(
            &self.mantisse * &autre.mantisse,
            u64::from(self.echelle) + u64::from(autre.echelle),
        )
    }

    /// Division arrondie à `precision` chiffres significatifs (demi-haut).
    /// None si diviseur nul ou si l’échelle du quotient dépasse ECHELLE_MAX.
    pub fn diviser(&self, diviseur: &Self, precision: u32) -> Option<Self> {
        if diviseur.is_zero() {
            return None;
        }

        // a/b = (ma·10^eb) / (mb·10^ea)
        let num = &self.mantisse * pow10(diviseur.echelle);
        let den = &diviseur.mantisse * pow10(self.echelle);

        // Troncature avec au moins precision+1 chiffres : la frontière demi-haut
        // tombe sur la grille, l’arrondi final reste donc correct.
        let k = (i64::from(precision) + 1 + i64::from(nb_chiffres(&den))
            - i64::from(nb_chiffres(&num)))
        .max(0);
        let k = u32::try_from(k).ok()?;

        let q = (num * pow10(k)) / den;
        let arrondi = Self::nouveau(q, k).arrondir_precision(precision);
        (arrondi.echelle <= ECHELLE_MAX).then_some(arrondi)
    }

    /// Division à échelle fixe (ex: 2 décimales pour les suggestions d’unités).
    pub fn diviser_echelle(&self, diviseur: &Self, echelle: u32, mode: Arrondi) -> Option<Self> {
        if diviseur.is_zero() {
            return None;
        }
        let num = &self.mantisse * pow10(diviseur.echelle.checked_add(echelle)?);
        let den = &diviseur.mantisse * pow10(self.echelle);
        Some(Self::nouveau(diviser_arrondi(&num, &den, mode), echelle))
    }

    /// Puissance entière, arrondie à `precision` chiffres significatifs.
    /// None pour 0^(négatif) ou si l’échelle dépasse ECHELLE_MAX.
    pub fn puissance(&self, exposant: i32, precision: u32) -> Option<Self> {
        let n = exposant.unsigned_abs();
        let echelle = u64::from(self.echelle) * u64::from(n);
        if echelle > u64::from(ECHELLE_MAX) {
            return None;
        }
        let brut = Self::nouveau(self.mantisse.pow(n), echelle as u32);

        if exposant >= 0 {
            Some(brut.arrondir_precision(precision))
        } else {
            Self::un().diviser(&brut, precision)
        }
    }

    /// Arrondi à `precision` chiffres significatifs (demi-haut).
    pub fn arrondir_precision(&self, precision: u32) -> Self {
        let chiffres = nb_chiffres(&self.mantisse);
        if chiffres <= precision {
            return self.clone();
        }
        let retrait = chiffres - precision;
        let m = diviser_arrondi(&self.mantisse, &pow10(retrait), Arrondi::DemiHaut);
        // échelle négative interdite : on remonte la mantisse
        if retrait <= self.echelle {
            Self::nouveau(m, self.echelle - retrait)
        } else {
            Self::nouveau(m * pow10(retrait - self.echelle), 0)
        }
    }

    /// Fixe le nombre de décimales (au plus ECHELLE_MAX).
    pub fn avec_echelle(&self, echelle: u32, mode: Arrondi) -> Self {
        let echelle = echelle.min(ECHELLE_MAX);
        if echelle >= self.echelle {
            return Self::nouveau(self.mantisse_a(echelle), echelle);
        }
        let m = diviser_arrondi(&self.mantisse, &pow10(self.echelle - echelle), mode);
        Self::nouveau(m, echelle)
    }

    /// Retire les zéros fractionnaires finaux (1.500 -> 1.5, 2.0 -> 2).
    pub fn sans_zeros(&self) -> Self {
        if self.mantisse.is_zero() {
            return Self::zero();
        }

        let dix = BigInt::from(10);
        let mut m = self.mantisse.clone();
        let mut e = self.echelle;
        while e > 0 && (&m % &dix).is_zero() {
            m /= &dix;
            e -= 1;
        }
        Self::nouveau(m, e)
    }

    pub fn est_entier(&self) -> bool {
        self.sans_zeros().echelle == 0
    }

    /// Conversion exacte vers i32 (None si fractionnaire ou hors bornes).
    pub fn vers_i32_exact(&self) -> Option<i32> {
        let s = self.sans_zeros();
        if s.echelle != 0 {
            return None;
        }
        s.mantisse.to_i32()
    }

    pub fn vers_i64(&self) -> Option<i64> {
        self.avec_echelle(0, Arrondi::Plancher).mantisse.to_i64()
    }

    /// Approximation binaire (NaN si non représentable).
    pub fn vers_f64(&self) -> f64 {
        BigRational::new(self.mantisse.clone(), pow10(self.echelle))
            .to_f64()
            .unwrap_or(f64::NAN)
    }

    /// Valeur binaire EXACTE de `x`, puis arrondie à `precision` chiffres.
    /// None pour NaN / infini.
    pub fn depuis_f64(x: f64, precision: u32) -> Option<Self> {
        let r = BigRational::from_float(x)?;
        let num = Self::nouveau(r.numer().clone(), 0);
        let den = Self::nouveau(r.denom().clone(), 0);
        num.diviser(&den, precision)
    }
}

/* ------------------------ Conversions ------------------------ */

impl From<i64> for Decimal {
    fn from(n: i64) -> Self {
        Self::nouveau(BigInt::from(n), 0)
    }
}

impl From<u64> for Decimal {
    fn from(n: u64) -> Self {
        Self::nouveau(BigInt::from(n), 0)
    }
}

/* ------------------------ Comparaison par valeur ------------------------ */

impl PartialEq for Decimal {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Decimal {}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Decimal {
    fn cmp(&self, other: &Self) -> Ordering {
        let (a, b, _) = self.aligner(other);
        a.cmp(&b)
    }
}

/* ------------------------ Opérateurs exacts ------------------------ */

impl Add for &Decimal {
    type Output = Decimal;

    fn add(self, rhs: &Decimal) -> Decimal {
        let (a, b, e) = self.aligner(rhs);
        Decimal::nouveau(a + b, e)
    }
}

impl Sub for &Decimal {
    type Output = Decimal;

    fn sub(self, rhs: &Decimal) -> Decimal {
        let (a, b, e) = self.aligner(rhs);
        Decimal::nouveau(a - b, e)
    }
}

impl Neg for Decimal {
    type Output = Decimal;

    fn neg(self) -> Decimal {
        Decimal::nouveau(-self.mantisse, self.echelle)
    }
}

/* ------------------------ Affichage “plain” ------------------------ */

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let chiffres = self.mantisse.magnitude().to_str_radix(10);
        let e = self.echelle as usize;

        let corps = if e == 0 {
            chiffres
        } else if chiffres.len() > e {
            let coupe = chiffres.len() - e;
            format!("{}.{}", &chiffres[..coupe], &chiffres[coupe..])
        } else {
            format!("0.{}{chiffres}", "0".repeat(e - chiffres.len()))
        };

        if self.mantisse.is_negative() {
            write!(f, "-{corps}")
        } else {
            f.write_str(&corps)
        }
    }
}
