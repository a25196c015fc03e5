// src/noyau/analyse.rs
//
// Descente récursive (précédence croissante) :
//
//   expression := addsub
//   addsub     := muldiv ( ('+'|'-') muldiv )*      exact
//   muldiv     := power ( ('*'|'/'|'%') power )*    '*' '%' exacts, '/' arrondi
//   power      := unary ( '^' power )?              associatif à droite, arrondi
//   unary      := ('-'|'+')? unary | postfix
//   postfix    := primary unit?                     exact
//   primary    := NUMBER | VARIABLE | FUNCTION '(' expression ')' | '(' expression ')'
//
// Chaque règle prend un index de jeton et rend (valeur, index suivant).

use tracing::trace;

use super::decimal::{Arrondi, Decimal};
use super::erreur::{ErreurCalc, GenreErreur};
use super::jetons::{multiplicateur, Jeton, Tok};
use super::memoire::Memoire;

/// Plus grand exposant accepté (en valeur absolue).
const EXPOSANT_MAX: i64 = 1000;

type Etape = Result<(Decimal, usize), ErreurCalc>;

pub struct Analyseur<'a> {
    jetons: &'a [Jeton],
    memoire: &'a Memoire,
    precision: u32,
}

impl<'a> Analyseur<'a> {
    pub fn new(jetons: &'a [Jeton], memoire: &'a Memoire, precision: u32) -> Self {
        Self {
            jetons,
            memoire,
            precision,
        }
    }

    /// Évalue toute la suite de jetons. Un jeton restant avant `Fin` est une erreur.
    pub fn evaluer(&self) -> Result<Decimal, ErreurCalc> {
        let (valeur, pos) = self.expression(0)?;
        match self.jetons.get(pos) {
            Some(j) if j.tok != Tok::Fin => Err(ErreurCalc::new(
                GenreErreur::UnexpectedToken(j.tok.to_string()),
                j.pos,
            )),
            _ => Ok(valeur),
        }
    }

    /* ------------------------ Accès aux jetons ------------------------ */

    fn position_fin(&self) -> usize {
        self.jetons.last().map_or(0, |j| j.pos)
    }

    fn jeton(&self, pos: usize) -> Result<&'a Jeton, ErreurCalc> {
        self.jetons
            .get(pos)
            .ok_or_else(|| ErreurCalc::new(GenreErreur::UnexpectedEnd, self.position_fin()))
    }

    /// Opérateur binaire parmi `ops` à l’index `pos`.
    fn operateur(&self, pos: usize, ops: &[char]) -> Option<(char, &'a Jeton)> {
        match self.jetons.get(pos) {
            Some(j @ Jeton { tok: Tok::Op(c), .. }) if ops.contains(c) => Some((*c, j)),
            _ => None,
        }
    }

    /// Opérateur suivi de rien : saisie incomplète (et non erreur “réelle”).
    fn exiger_operande(&self, pos_op: usize, op: &Jeton) -> Result<(), ErreurCalc> {
        match self.jetons.get(pos_op + 1) {
            None | Some(Jeton { tok: Tok::Fin, .. }) => Err(ErreurCalc::new(
                GenreErreur::UnfinishedExpression,
                op.pos,
            )),
            Some(_) => Ok(()),
        }
    }

    /* ------------------------ Règles ------------------------ */

    fn expression(&self, pos: usize) -> Etape {
        self.addsub(pos)
    }

    fn addsub(&self, pos: usize) -> Etape {
        let (mut gauche, mut pos) = self.muldiv(pos)?;

        while let Some((op, jeton)) = self.operateur(pos, &['+', '-']) {
            self.exiger_operande(pos, jeton)?;
            let (droite, suivant) = self.muldiv(pos + 1)?;

            gauche = if op == '+' {
                &gauche + &droite
            } else {
                &gauche - &droite
            };
            pos = suivant;
        }

        Ok((gauche, pos))
    }

    fn muldiv(&self, pos: usize) -> Etape {
        let (mut gauche, mut pos) = self.power(pos)?;

        while let Some((op, jeton)) = self.operateur(pos, &['*', '/', '%']) {
            self.exiger_operande(pos, jeton)?;
            let (droite, suivant) = self.power(pos + 1)?;

            let erreur = |genre| ErreurCalc::new(genre, jeton.pos);
            gauche = match op {
                '*' => gauche
                    .produit(&droite)
                    .ok_or_else(|| erreur(GenreErreur::InvalidNumber))?,
                '/' if droite.is_zero() => return Err(erreur(GenreErreur::DivisionByZero)),
                '/' => gauche
                    .diviser(&droite, self.precision)
                    .ok_or_else(|| erreur(GenreErreur::InvalidNumber))?
                    .sans_zeros(),
                _ => gauche
                    .reste(&droite)
                    .ok_or_else(|| erreur(GenreErreur::ModuloByZero))?,
            };
            pos = suivant;
        }

        Ok((gauche, pos))
    }

    fn power(&self, pos: usize) -> Etape {
        let (base, pos) = self.unary(pos)?;

        let Some((_, jeton)) = self.operateur(pos, &['^']) else {
            return Ok((base, pos));
        };
        self.exiger_operande(pos, jeton)?;

        // associatif à droite : 2^3^2 = 2^(3^2)
        let (exposant, suivant) = self.power(pos + 1)?;
        let erreur = |genre| ErreurCalc::new(genre, jeton.pos);

        if exposant.abs() > Decimal::from(EXPOSANT_MAX) {
            return Err(erreur(GenreErreur::ExponentTooLarge));
        }
        if base.is_negative() && !exposant.est_entier() {
            return Err(erreur(GenreErreur::NegativePower));
        }

        // exposant fractionnaire, 0^(négatif) ou échelle hors bornes : même refus
        let n = exposant
            .vers_i32_exact()
            .ok_or_else(|| erreur(GenreErreur::NegativePower))?;
        let valeur = base
            .puissance(n, self.precision)
            .ok_or_else(|| erreur(GenreErreur::NegativePower))?;

        Ok((valeur, suivant))
    }

    fn unary(&self, pos: usize) -> Etape {
        match &self.jeton(pos)?.tok {
            Tok::Op('-') => {
                let (v, suivant) = self.unary(pos + 1)?;
                Ok((-v, suivant))
            }
            Tok::Op('+') => self.unary(pos + 1),
            _ => self.postfix(pos),
        }
    }

    fn postfix(&self, pos: usize) -> Etape {
        let (valeur, pos) = self.primary(pos)?;

        if let Some(Jeton {
            tok: Tok::Unite(u),
            pos: pos_unite,
        }) = self.jetons.get(pos)
        {
            if let Some(m) = multiplicateur(u) {
                let produit = valeur
                    .produit(&m)
                    .ok_or_else(|| ErreurCalc::new(GenreErreur::InvalidNumber, *pos_unite))?;
                return Ok((produit, pos + 1));
            }
        }

        Ok((valeur, pos))
    }

    fn primary(&self, pos: usize) -> Etape {
        let jeton = self.jeton(pos)?;

        match &jeton.tok {
            Tok::Num { valeur, .. } => Ok((valeur.clone(), pos + 1)),

            Tok::Var(nom) => match self.memoire.variable(nom) {
                Some(v) => Ok((v.clone(), pos + 1)),
                None => Err(ErreurCalc::new(
                    GenreErreur::UndefinedVariable(nom.clone()),
                    jeton.pos,
                )),
            },

            Tok::Fonction(nom) => {
                if !matches!(self.jetons.get(pos + 1), Some(Jeton { tok: Tok::LPar, .. })) {
                    return Err(ErreurCalc::new(
                        GenreErreur::ExpectedParenthesis(nom.clone()),
                        jeton.pos,
                    ));
                }

                let (arg, suivant) = self.expression(pos + 2)?;
                if !matches!(self.jetons.get(suivant), Some(Jeton { tok: Tok::RPar, .. })) {
                    return Err(ErreurCalc::new(
                        GenreErreur::ExpectedClosingParen,
                        jeton.pos,
                    ));
                }

                let valeur = self.appliquer_fonction(nom, arg, jeton.pos)?;
                Ok((valeur, suivant + 1))
            }

            Tok::LPar => {
                let (interieur, suivant) = self.expression(pos + 1)?;
                if !matches!(self.jetons.get(suivant), Some(Jeton { tok: Tok::RPar, .. })) {
                    return Err(ErreurCalc::new(
                        GenreErreur::UnmatchedParenthesis,
                        jeton.pos,
                    ));
                }
                Ok((interieur, suivant + 1))
            }

            Tok::Fin => Err(ErreurCalc::new(GenreErreur::UnexpectedEnd, jeton.pos)),

            autre => Err(ErreurCalc::new(
                GenreErreur::UnexpectedToken(autre.to_string()),
                jeton.pos,
            )),
        }
    }

    /* ------------------------ Fonctions ------------------------ */

    fn appliquer_fonction(
        &self,
        nom: &str,
        arg: Decimal,
        pos: usize,
    ) -> Result<Decimal, ErreurCalc> {
        trace!(fonction = nom, argument = %arg, "appel de fonction");

        match nom {
            "sqrt" => {
                if arg.is_negative() {
                    return Err(ErreurCalc::new(GenreErreur::NegativeSqrt, pos));
                }
                // √ en flottant, puis ré-arrondie à la précision décimale
                Decimal::depuis_f64(arg.vers_f64().sqrt(), self.precision)
                    .ok_or_else(|| ErreurCalc::new(GenreErreur::InvalidNumber, pos))
            }
            "abs" => Ok(arg.abs()),
            "floor" => Ok(arg.avec_echelle(0, Arrondi::Plancher)),
            "ceil" => Ok(arg.avec_echelle(0, Arrondi::Plafond)),
            "round" => Ok(arg.avec_echelle(0, Arrondi::DemiHaut)),
            _ => Err(ErreurCalc::new(
                GenreErreur::UnknownFunction(nom.to_string()),
                pos,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noyau::jetons::tokenize;

    fn evaluer_avec(s: &str, memoire: &Memoire) -> Result<Decimal, ErreurCalc> {
        let jetons = tokenize(s, memoire.last_answer())?;
        Analyseur::new(&jetons, memoire, 50).evaluer()
    }

    fn ok(s: &str) -> Decimal {
        evaluer_avec(s, &Memoire::default())
            .unwrap_or_else(|e| panic!("évaluation de {s:?} erreur: {e}"))
    }

    fn err(s: &str) -> ErreurCalc {
        match evaluer_avec(s, &Memoire::default()) {
            Ok(v) => panic!("{s:?} devait échouer, obtenu {v}"),
            Err(e) => e,
        }
    }

    fn d(s: &str) -> Decimal {
        Decimal::depuis_texte(s).unwrap()
    }

    #[test]
    fn precedence_et_associativite() {
        assert_eq!(ok("2+3*4"), d("14"));
        assert_eq!(ok("(2+3)*4"), d("20"));
        assert_eq!(ok("10-4-3"), d("3"));
        assert_eq!(ok("2^3^2"), d("512"));
        assert_eq!(ok("100/10/5"), d("2"));
        assert_eq!(ok("7%4*2"), d("6"));
    }

    #[test]
    fn unaires() {
        assert_eq!(ok("-5+2"), d("-3"));
        assert_eq!(ok("--5"), d("5"));
        assert_eq!(ok("+-+5"), d("-5"));
        // le moins unaire lie plus fort que ^
        assert_eq!(ok("-2^2"), d("4"));
        assert_eq!(ok("2^-1"), d("0.5"));
    }

    #[test]
    fn unites() {
        assert_eq!(ok("5k"), d("5000"));
        assert_eq!(ok("2h"), d("3456"));
        assert_eq!(ok("1eb"), d("2880"));
        assert_eq!(ok("1.5m + 500k"), d("2000000"));
        assert_eq!(ok("2 dc / 2"), d("3456"));
        assert_eq!(ok("3s"), d("192"));
        assert_eq!(ok("10bx50k"), d("500000000000000"));
    }

    #[test]
    fn fonctions() {
        assert_eq!(ok("sqrt(16)"), d("4"));
        assert_eq!(ok("abs(-3.5)"), d("3.5"));
        assert_eq!(ok("floor(-2.5)"), d("-3"));
        assert_eq!(ok("ceil(2.1)"), d("3"));
        assert_eq!(ok("round(2.5)"), d("3"));
        assert_eq!(ok("round(-2.5)"), d("-3"));
        assert_eq!(ok("sqrt(2)").avec_echelle(10, Arrondi::DemiHaut), d("1.4142135624"));
    }

    #[test]
    fn erreurs_positionnees() {
        let e = err("5+");
        assert_eq!(e.genre, GenreErreur::UnfinishedExpression);
        assert_eq!(e.position, 1);

        let e = err("8 / (2-2)");
        assert_eq!(e.genre, GenreErreur::DivisionByZero);
        assert_eq!(e.position, 2);

        assert_eq!(err("5 % 0").genre, GenreErreur::ModuloByZero);
        assert_eq!(err("sqrt(-4)").genre, GenreErreur::NegativeSqrt);
        assert_eq!(err("2^1001").genre, GenreErreur::ExponentTooLarge);
        assert_eq!(err("(-8)^0.5").genre, GenreErreur::NegativePower);
        assert_eq!(err("4^0.5").genre, GenreErreur::NegativePower);
        assert_eq!(err("0^-1").genre, GenreErreur::NegativePower);
    }

    #[test]
    fn puissances_en_chaine_sans_debordement() {
        let e = err("(((0.1^1000)^1000)^1000)^5");
        assert_eq!(e.genre, GenreErreur::NegativePower);
        assert_eq!(e.position, 24);

        let e = err("((0.1^1000)^1000)^1000 * ((0.1^1000)^1000)^1000 * ((0.1^1000)^1000)^1000");
        assert_eq!(e.genre, GenreErreur::InvalidNumber);
    }

    #[test]
    fn erreurs_de_structure() {
        let e = err("sqrt 4");
        assert_eq!(e.genre, GenreErreur::ExpectedParenthesis("sqrt".into()));
        assert_eq!(e.position, 0);

        assert_eq!(err("abs(3").genre, GenreErreur::ExpectedClosingParen);

        let e = err("2*(3+4");
        assert_eq!(e.genre, GenreErreur::UnmatchedParenthesis);
        assert_eq!(e.position, 2);

        assert_eq!(err("(").genre, GenreErreur::UnexpectedEnd);
        assert_eq!(err("-").genre, GenreErreur::UnexpectedEnd);
        assert_eq!(err(")").genre, GenreErreur::UnexpectedToken(")".into()));
        assert_eq!(err("2 3").genre, GenreErreur::UnexpectedToken("3".into()));
        assert_eq!(
            err("prix * 2").genre,
            GenreErreur::UndefinedVariable("prix".into())
        );
    }

    #[test]
    fn variables_de_la_memoire() {
        let mut m = Memoire::default();
        m.set_variable("x", d("10"));
        assert_eq!(evaluer_avec("x", &m).unwrap(), d("10"));
        assert_eq!(
            evaluer_avec("2x", &m).unwrap_err().genre,
            GenreErreur::UnfinishedExpression
        );
        assert_eq!(evaluer_avec("$X * 3", &m).unwrap(), d("30"));
    }

    #[test]
    fn fonction_inconnue() {
        let m = Memoire::default();
        let jetons = tokenize("1", m.last_answer()).unwrap();
        let a = Analyseur::new(&jetons, &m, 50);
        let e = a.appliquer_fonction("tan", d("1"), 3).unwrap_err();
        assert_eq!(e.genre, GenreErreur::UnknownFunction("tan".into()));
        assert_eq!(e.position, 3);
    }
}
