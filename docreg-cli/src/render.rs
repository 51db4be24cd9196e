//! Text rendering of form and listing state

use docreg_client::model::EmployeeSummary;
use docreg_forms::Announcement;
use docreg_forms::FormController;
use docreg_forms::Priority;
use docreg_forms::SubmissionState;
use docreg_forms::validation::PasswordStrength;
use docreg_forms::validation::StrengthLevel;
use docreg_forms::validation::format_cpf;

/// One line per registry entry, labelled like the on-screen fields.
pub fn errors(form: &FormController) -> Vec<String> {
    form.errors()
        .into_iter()
        .map(|e| {
            let label = form.label(&e.field_id).unwrap_or(e.field_id);
            format!("  ✗ {label}: {}", e.message)
        })
        .collect()
}

/// Assertive messages are prefixed so they stand out in a plain terminal.
pub fn announcement(announcement: &Announcement) -> String {
    match announcement.priority {
        Priority::Assertive => format!("!! {}", announcement.message),
        Priority::Polite => announcement.message.clone(),
    }
}

pub fn state(state: &SubmissionState) -> String {
    match state {
        SubmissionState::Idle => "pronto".to_string(),
        SubmissionState::Validating => "validando...".to_string(),
        SubmissionState::Submitting => "enviando...".to_string(),
        SubmissionState::Success => "enviado".to_string(),
        SubmissionState::Failed(reason) => format!("erro: {reason}"),
    }
}

/// Strength meter shown under the password field.
pub fn password(strength: &PasswordStrength) -> String {
    let bar = match strength.level {
        StrengthLevel::Weak => "[#    ] fraca",
        StrengthLevel::Medium => "[###  ] média",
        StrengthLevel::Strong => "[#####] forte",
    };
    format!("  {bar} - {}", strength.feedback())
}

/// Listing table. Columns are padded to the widest cell.
pub fn employee_table(employees: &[EmployeeSummary]) -> Vec<String> {
    if employees.is_empty() {
        return vec!["Nenhum funcionário encontrado.".to_string()];
    }

    let rows: Vec<[String; 4]> = employees
        .iter()
        .map(|e| {
            [
                e.employee_name.clone(),
                format_cpf(&e.cpf).unwrap_or_else(|| e.cpf.clone()),
                e.company_name.clone(),
                e.status.label().to_string(),
            ]
        })
        .collect();

    let header = ["Nome", "CPF", "Empresa", "Status"].map(str::to_string);
    let mut widths = header.clone().map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_row = |cells: &[String; 4]| {
        let mut line = String::new();
        for (i, (cell, width)) in cells.iter().zip(widths).enumerate() {
            if i > 0 {
                line.push_str(" | ");
            }
            line.push_str(cell);
            if i + 1 < cells.len() {
                let pad = width - cell.chars().count();
                line.extend(std::iter::repeat_n(' ', pad));
            }
        }
        line
    };

    let mut lines = vec![format_row(&header)];
    lines.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    lines.extend(rows.iter().map(format_row));
    lines
}
