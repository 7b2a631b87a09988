//! Markup for the reservation screen.
//!
//! The view is a pure function of the screen state; all dynamic text is
//! escaped.

use crate::eligibility::Panel;
use crate::types::{MoveReserveState, ReservationStatus};
use crate::validation::FormField;
use shelter_core::environment::Translator;
use std::fmt::Write;

/// Escape text for use in HTML content and attribute values
#[must_use]
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Markup for a named icon
#[must_use]
pub fn icon(name: &str) -> String {
    format!("<span class=\"asm-icon asm-icon-{}\"></span>", escape(name))
}

fn hidden(visible: bool) -> &'static str {
    if visible { "" } else { " style=\"display: none\"" }
}

fn highlight(state: &MoveReserveState, field: FormField) -> &'static str {
    if state.highlighted == Some(field) {
        " ui-state-error"
    } else {
        ""
    }
}

fn notice_panel(out: &mut String, panel: Panel, class: &str, icon_class: &str, text: &str, visible: bool) {
    let _ = writeln!(
        out,
        "<div id=\"{}\" class=\"{class} ui-corner-all\"{}>",
        panel.id(),
        hidden(visible)
    );
    let _ = writeln!(
        out,
        "<p class=\"centered\"><span class=\"ui-icon {icon_class}\"></span>"
    );
    let _ = writeln!(out, "<span class=\"centered\">{}</span>", escape(text));
    out.push_str("</p>\n</div>\n");
}

fn text_row(out: &mut String, id: &str, label: &str, value: &str, extra_class: &str, row_visible: bool) {
    let _ = writeln!(out, "<tr id=\"{id}row\"{}>", hidden(row_visible));
    let _ = writeln!(out, "<td><label for=\"{id}\">{}</label></td>", escape(label));
    let _ = writeln!(
        out,
        "<td><input id=\"{id}\" data=\"{id}\" class=\"asm-textbox{extra_class}\" value=\"{}\" /></td>",
        escape(value)
    );
    out.push_str("</tr>\n");
}

/// Render the screen for `state`.
///
/// `statuses` populates the reservation status select.
#[must_use]
pub fn render(
    state: &MoveReserveState,
    statuses: &[ReservationStatus],
    translator: &dyn Translator,
) -> String {
    let t = |text: &str| translator.translate(text);
    let panels = &state.panels;
    let mut out = String::new();

    out.push_str("<div id=\"asm-content\">\n");
    let _ = writeln!(
        out,
        "<input id=\"movementid\" type=\"hidden\" value=\"{}\" />",
        escape(&state.form.movement_id)
    );
    let _ = writeln!(
        out,
        "<div class=\"asm-content-header\"><h2>{}</h2></div>",
        escape(&t("Reserve an animal"))
    );
    if let Some(busy) = &state.busy {
        let _ = writeln!(out, "<div id=\"asm-loading\">{}</div>", escape(busy));
    }
    if let Some(error) = &state.header_error {
        let _ = writeln!(out, "<div id=\"asm-header-error\" class=\"ui-state-error\">{}</div>", escape(error));
    }

    notice_panel(
        &mut out,
        Panel::FeeInfo,
        "ui-state-highlight",
        "ui-icon-info",
        panels.fee_info.as_deref().unwrap_or_default(),
        panels.is_visible(Panel::FeeInfo),
    );
    notice_panel(
        &mut out,
        Panel::OwnerWarning,
        "ui-state-error",
        "ui-icon-alert",
        panels.owner_warning.as_deref().unwrap_or_default(),
        panels.is_visible(Panel::OwnerWarning),
    );
    notice_panel(
        &mut out,
        Panel::MultipleReserve,
        "ui-state-error",
        "ui-icon-alert",
        &t("This animal already has an active reservation."),
        panels.is_visible(Panel::MultipleReserve),
    );
    notice_panel(
        &mut out,
        Panel::NotOnShelter,
        "ui-state-error",
        "ui-icon-alert",
        &t("This animal is not on the shelter."),
        panels.is_visible(Panel::NotOnShelter),
    );

    out.push_str("<table class=\"asm-table-layout\">\n");
    for (field, chooser, label, value) in [
        (FormField::Animal, "asm-animalchooser", t("Animal"), &state.form.animal_id),
        (FormField::Person, "asm-personchooser", t("Reservation For"), &state.form.person_id),
    ] {
        let id = field.id();
        let _ = writeln!(out, "<tr>\n<td><label for=\"{id}\">{}</label></td>", escape(&label));
        let _ = writeln!(
            out,
            "<td><input id=\"{id}\" data=\"{id}\" type=\"hidden\" class=\"{chooser}{}\" value=\"{}\" /></td>\n</tr>",
            highlight(state, field),
            escape(value)
        );
    }
    text_row(
        &mut out,
        "movementnumber",
        &t("Movement Number"),
        &state.form.movement_number,
        "",
        state.movement_number_visible,
    );
    text_row(
        &mut out,
        FormField::ReservationDate.id(),
        &t("Date"),
        &state.form.reservation_date,
        &format!(" asm-datebox{}", highlight(state, FormField::ReservationDate)),
        true,
    );

    let _ = writeln!(
        out,
        "<tr>\n<td><label for=\"reservationstatus\">{}</label></td>",
        escape(&t("Status"))
    );
    out.push_str("<td><select id=\"reservationstatus\" data=\"reservationstatus\" class=\"asm-selectbox\">\n");
    for status in statuses {
        let id = status.id.to_string();
        let selected = if id == state.form.reservation_status { " selected=\"selected\"" } else { "" };
        let _ = writeln!(
            out,
            "<option value=\"{id}\"{selected}>{}</option>",
            escape(&status.name)
        );
    }
    out.push_str("</select></td>\n</tr>\n</table>\n");

    let _ = writeln!(out, "<div id=\"payment\"{}>", hidden(state.payment_visible));
    let _ = writeln!(
        out,
        "<label for=\"giftaid\">{}</label> <select id=\"giftaid\" data=\"giftaid\" class=\"asm-selectbox\">",
        escape(&t("Gift Aid"))
    );
    for (value, label) in [("0", t("No")), ("1", t("Yes"))] {
        let selected = if (value == "1") == state.form.gift_aid { " selected=\"selected\"" } else { "" };
        let _ = writeln!(out, "<option value=\"{value}\"{selected}>{}</option>", escape(&label));
    }
    out.push_str("</select>\n");
    let _ = writeln!(
        out,
        "<label for=\"amount1\">{}</label> <input id=\"amount1\" data=\"amount1\" class=\"asm-currencybox\" value=\"{}\" />",
        escape(&t("Amount")),
        escape(&state.form.payment_amount)
    );
    out.push_str("</div>\n");

    let _ = writeln!(out, "<div id=\"templatelist\">{}</div>", state.template_list);
    let _ = writeln!(
        out,
        "<div class=\"centered\"><button id=\"reserve\"{}>{} {}</button></div>",
        if state.submit_enabled { "" } else { " disabled=\"disabled\"" },
        icon("movement"),
        escape(&t("Reserve"))
    );
    out.push_str("</div>\n");
    out
}
