// src/app/vue.rs
//
// Vue (UI egui) : natif + web
// ---------------------------
// Objectifs :
// - Même AppCalc (etat.rs) pour natif + wasm
// - Saisie en direct : résultat affiché sous le champ à chaque frappe
// - Clavier : Enter valide (historique), Ctrl+Z / Ctrl+Y naviguent (app.rs)
// - Tactile : gros boutons, focus redonné après clic (focus_entree)
// - Panneaux : historique (cliquable), variables (+ formulaire)
//
// Note :
// - PAS de Key::NumEnter (n’existe pas dans egui 0.33.x)

use eframe::egui;

use super::etat::AppCalc;
use crate::noyau::memoire::MAX_HISTORIQUE;

impl AppCalc {
    /// UI principale : à appeler depuis eframe::App::update(...)
    pub fn ui(&mut self, ui: &mut egui::Ui) {
        // Densité “calc”
        ui.spacing_mut().item_spacing = egui::vec2(6.0, 6.0);

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.heading("Calculatrice à unités");
                ui.add_space(6.0);

                self.ui_entree(ui);

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                self.ui_resultats(ui);

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                self.ui_historique(ui);
                self.ui_variables(ui);
            });
    }

    fn ui_entree(&mut self, ui: &mut egui::Ui) {
        ui.label("Entrée :");

        // IMPORTANT : id stable + focus contrôlé
        let resp = ui.add(
            egui::TextEdit::singleline(&mut self.entree.0)
                .desired_width(ui.available_width())
                .hint_text("Ex: 5k*3, 2s + 10, 10x5, sqrt(2)*$prix")
                .id_salt("entree_edit")
                .code_editor(),
        );

        // Si on a cliqué un bouton (pavé / unités / DEL / C / etc.), on redonne le focus
        if self.focus_entree {
            resp.request_focus();
            self.focus_entree = false;
        }

        if resp.changed() {
            self.synchroniser_saisie();
        }

        // --- Clavier : Enter valide ---
        // Un singleline perd le focus sur Enter : on teste les deux.
        let enter = ui.input(|i| i.key_pressed(egui::Key::Enter));
        if resp.lost_focus() && enter {
            self.valider();
            self.focus_entree = true;
        }

        // Résultat en direct (jamais d’erreur ici)
        match self.resultat_direct() {
            Some(r) => {
                ui.monospace(format!("= {r}"));
            }
            None => {
                ui.weak(" ");
            }
        }

        ui.add_space(6.0);

        ui.horizontal(|ui| {
            // Contrat: C = entrée seulement ; CLR = résultats seulement ; AC = tout
            self.bouton_action(ui, "C", "Efface seulement l’entrée", Action::ClearEntree);
            self.bouton_action(ui, "CLR", "Efface résultat + erreur", Action::ClearResultats);
            self.bouton_action(
                ui,
                "AC",
                "Remise à zéro totale (variables, historique, ans)",
                Action::ResetTotal,
            );

            ui.separator();

            self.bouton_action(ui, "Préc", "Historique : plus ancien (Ctrl+Z)", Action::Precedent);
            self.bouton_action(ui, "Suiv", "Historique : plus récent (Ctrl+Y)", Action::Suivant);
        });

        ui.add_space(8.0);

        // Opérateurs + fonctions + "="
        ui.horizontal_wrapped(|ui| {
            self.bouton_insert(ui, "(", "(", InsertKind::OpenParen);
            self.bouton_insert(ui, ")", ")", InsertKind::CloseParen);

            self.bouton_insert(ui, "+", "+", InsertKind::Op);
            self.bouton_insert(ui, "-", "-", InsertKind::Op);
            self.bouton_insert(ui, "*", "*", InsertKind::Op);
            self.bouton_insert(ui, "/", "/", InsertKind::Op);
            self.bouton_insert(ui, "^", "^", InsertKind::Op);
            self.bouton_insert(ui, "%", "%", InsertKind::Op);

            ui.separator();

            for f in ["sqrt", "abs", "floor", "ceil", "round"] {
                self.bouton_insert(ui, f, &format!("{f}("), InsertKind::Func);
            }
            self.bouton_insert(ui, "ans", "ans", InsertKind::Word);

            ui.add_space(10.0);

            let eq = ui.add_sized([64.0, 32.0], egui::Button::new("="));
            if eq.clicked() {
                self.valider();
                self.focus_entree = true;
            }
        });

        ui.add_space(4.0);

        // Unités (collées au nombre)
        ui.horizontal_wrapped(|ui| {
            for (u, tip) in [
                ("k", "×1 000"),
                ("m", "×1 000 000"),
                ("b", "×1 000 000 000"),
                ("t", "×1 000 000 000 000"),
                ("s", "stack (64)"),
                ("e", "160"),
                ("h", "shulker (1 728)"),
                ("sc", "petit coffre (1 728)"),
                ("dc", "double coffre (3 456)"),
                ("eb", "ender chest (2 880)"),
            ] {
                self.bouton_insert(ui, u, u, InsertKind::Unite).on_hover_text(tip);
            }
        });

        ui.add_space(8.0);

        // Pavé numérique
        self.ui_pave_numerique(ui);

        if !self.erreur.is_empty() {
            ui.add_space(6.0);
            ui.colored_label(ui.visuals().error_fg_color, &self.erreur);
        }
    }

    fn ui_pave_numerique(&mut self, ui: &mut egui::Ui) {
        egui::Grid::new("pave_numerique_unites")
            .num_columns(4)
            .spacing([6.0, 6.0])
            .show(ui, |ui| {
                self.bouton_insert(ui, "7", "7", InsertKind::Digit);
                self.bouton_insert(ui, "8", "8", InsertKind::Digit);
                self.bouton_insert(ui, "9", "9", InsertKind::Digit);
                self.bouton_action(ui, "DEL", "Efface le dernier symbole", Action::Backspace);
                ui.end_row();

                self.bouton_insert(ui, "4", "4", InsertKind::Digit);
                self.bouton_insert(ui, "5", "5", InsertKind::Digit);
                self.bouton_insert(ui, "6", "6", InsertKind::Digit);
                self.bouton_insert(ui, "x", "x", InsertKind::Digit);
                ui.end_row();

                self.bouton_insert(ui, "1", "1", InsertKind::Digit);
                self.bouton_insert(ui, "2", "2", InsertKind::Digit);
                self.bouton_insert(ui, "3", "3", InsertKind::Digit);
                self.bouton_insert(ui, ".", ".", InsertKind::Digit);
                ui.end_row();

                self.bouton_insert(ui, "0", "0", InsertKind::Digit);
                self.bouton_insert(ui, "$", "$", InsertKind::Word);
                ui.label("");
                ui.label("");
                ui.end_row();
            });
    }

    /// Backspace “intelligent” : retire d’un coup les motifs utiles ("sqrt(", "ans", etc.).
    fn backspace_entree(&mut self) {
        let entree = &mut self.entree.0;
        if entree.is_empty() {
            return;
        }

        // Retire espaces finaux
        while entree.ends_with(' ') {
            entree.pop();
        }

        // Retire tokens connus
        for pat in ["sqrt(", "abs(", "floor(", "ceil(", "round(", "ans"] {
            if entree.ends_with(pat) {
                for _ in 0..pat.chars().count() {
                    entree.pop();
                }
                while entree.ends_with(' ') {
                    entree.pop();
                }
                return;
            }
        }

        // Sinon : un caractère
        entree.pop();
        while entree.ends_with(' ') {
            entree.pop();
        }
    }

    fn ui_resultats(&mut self, ui: &mut egui::Ui) {
        ui.label("Résultat :");
        Self::champ_monospace(ui, "resultat_out", &self.resultat, 2);
    }

    fn ui_historique(&mut self, ui: &mut egui::Ui) {
        let historique = self.evaluateur.history();
        let titre = format!("Historique ({}/{MAX_HISTORIQUE})", historique.len());

        let mut rappel: Option<String> = None;
        egui::CollapsingHeader::new(titre)
            .id_salt("panneau_historique")
            .default_open(true)
            .show(ui, |ui| {
                if historique.is_empty() {
                    ui.weak("vide");
                }
                // du plus récent au plus ancien
                for (i, expr) in historique.iter().enumerate().rev() {
                    if ui.link(format!("{}. {expr}", i + 1)).clicked() {
                        rappel = Some(expr.clone());
                    }
                }

                ui.add_space(4.0);
                if ui.button("Effacer l’historique").clicked() {
                    self.effacer_historique();
                }
                ui.weak("Ctrl+Z / Ctrl+Y : parcourir l’historique");
            });

        if let Some(expr) = rappel {
            self.rappeler(&expr);
        }
    }

    fn ui_variables(&mut self, ui: &mut egui::Ui) {
        egui::CollapsingHeader::new("Variables")
            .id_salt("panneau_variables")
            .default_open(false)
            .show(ui, |ui| {
                let listing = self.evaluateur.describe_variables();
                Self::champ_monospace(ui, "variables_out", &listing, 2);

                ui.add_space(4.0);
                ui.horizontal(|ui| {
                    ui.add(
                        egui::TextEdit::singleline(&mut self.var_nom)
                            .desired_width(90.0)
                            .hint_text("$nom"),
                    );
                    ui.label("=");
                    ui.add(
                        egui::TextEdit::singleline(&mut self.var_expr)
                            .desired_width(160.0)
                            .hint_text("expression"),
                    );
                    if ui.button("Définir").clicked() {
                        self.affecter_variable();
                    }
                });
            });
    }

    fn champ_monospace(ui: &mut egui::Ui, id: &str, contenu: &str, rows: usize) {
        // Affichage lecture seule “stable”, sans TextEdit interactif.
        egui::Frame::group(ui.style())
            .fill(ui.visuals().extreme_bg_color)
            .show(ui, |ui| {
                ui.push_id(id, |ui| {
                    ui.set_min_width(ui.available_width());
                    ui.set_min_height(
                        rows as f32 * ui.text_style_height(&egui::TextStyle::Monospace),
                    );
                    ui.monospace(contenu);
                });
            });
    }

    fn bouton_action(&mut self, ui: &mut egui::Ui, label: &str, tip: &str, action: Action) {
        let resp = ui
            .add_sized([56.0, 30.0], egui::Button::new(label))
            .on_hover_text(tip);

        if resp.clicked() {
            match action {
                Action::ClearEntree => self.clear_entree(),
                Action::ClearResultats => self.clear_resultats(),
                Action::ResetTotal => self.reset_total(),
                Action::Backspace => {
                    self.backspace_entree();
                    self.synchroniser_saisie();
                }
                Action::Precedent => self.historique_precedent(),
                Action::Suivant => self.historique_suivant(),
            }
            self.focus_entree = true;
        }
    }

    fn bouton_insert(
        &mut self,
        ui: &mut egui::Ui,
        label: &str,
        to_insert: &str,
        kind: InsertKind,
    ) -> egui::Response {
        let resp = ui.add_sized([46.0, 28.0], egui::Button::new(label));
        if !resp.clicked() || to_insert.is_empty() {
            return resp;
        }

        let entree = &mut self.entree.0;
        match kind {
            InsertKind::CloseParen | InsertKind::Unite => {
                // collé à ce qui précède : "5k", "(2+3)"
                while entree.ends_with(' ') {
                    entree.pop();
                }
                entree.push_str(to_insert);
            }
            InsertKind::OpenParen | InsertKind::Func => {
                if !entree.is_empty() {
                    let last = entree.chars().rev().find(|c| !c.is_whitespace());
                    if let Some(c) = last {
                        if c.is_ascii_digit() || c.is_ascii_alphabetic() || c == ')' {
                            entree.push(' ');
                        }
                    }
                }
                entree.push_str(to_insert);
            }
            InsertKind::Op => {
                while entree.ends_with(' ') {
                    entree.pop();
                }
                if !entree.is_empty() {
                    entree.push(' ');
                }
                entree.push_str(to_insert);
                entree.push(' ');
            }
            InsertKind::Digit => {
                // chiffres: pas d’espaces auto
                entree.push_str(to_insert);
            }
            InsertKind::Word => {
                // mots: espace si juste avant c’est un chiffre ou ')'
                if !entree.is_empty() && !entree.ends_with(char::is_whitespace) {
                    let last = entree.chars().rev().find(|c| !c.is_whitespace());
                    if let Some(c) = last {
                        if c.is_ascii_digit() || c == ')' {
                            entree.push(' ');
                        }
                    }
                }
                entree.push_str(to_insert);
            }
        }

        self.synchroniser_saisie();
        self.focus_entree = true;
        resp
    }
}

#[derive(Clone, Copy, Debug)]
enum Action {
    ClearEntree,
    ClearResultats,
    ResetTotal,
    Backspace,
    Precedent,
    Suivant,
}

#[derive(Clone, Copy, Debug)]
enum InsertKind {
    Digit,
    Word,
    Func,
    Op,
    Unite,
    OpenParen,
    CloseParen,
}
