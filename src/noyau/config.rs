// src/noyau/config.rs
//
// Configuration explicite, passée au constructeur de l’évaluateur.
// Pas d’état global : deux évaluateurs peuvent vivre avec deux configs.

/// Précision affichée par défaut (valeur “utilisateur”).
pub const PRECISION_DEFAUT: u32 = 10;

/// Plancher interne : ÷ et ^ travaillent toujours avec au moins 50 chiffres.
pub const PRECISION_MIN_INTERNE: u32 = 50;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfigCalc {
    pub decimal_precision: u32,
    pub show_unit_suggestions: bool,
    pub history_navigation: bool,
    pub inline_results: bool,
}

impl Default for ConfigCalc {
    fn default() -> Self {
        Self {
            decimal_precision: PRECISION_DEFAUT,
            show_unit_suggestions: true,
            history_navigation: true,
            inline_results: true,
        }
    }
}

impl ConfigCalc {
    /// Précision réellement utilisée par ÷, ^ et √.
    pub fn precision_interne(&self) -> u32 {
        self.decimal_precision.max(PRECISION_MIN_INTERNE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plancher_sans_plafond() {
        let mut c = ConfigCalc::default();
        assert_eq!(c.precision_interne(), PRECISION_MIN_INTERNE);

        c.decimal_precision = 80;
        assert_eq!(c.precision_interne(), 80);

        c.decimal_precision = 1500;
        assert_eq!(c.precision_interne(), 1500);
    }
}
