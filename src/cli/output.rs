//! Table / JSON rendering for CLI results

use clap::ValueEnum;
use serde::Serialize;

use crate::model::{Assessment, InfirmaryRecord, InventoryItem, Member, Nurse, NurseStats};
use crate::reports::ReportRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

/// Column-aligned text table
#[derive(Debug, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn render(&self) -> String {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                if let Some(w) = widths.get_mut(i) {
                    *w = (*w).max(cell.chars().count());
                }
            }
        }

        let line = |cells: &[String]| {
            cells
                .iter()
                .zip(&widths)
                .map(|(c, w)| format!("{:<width$}", c, width = *w))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };

        let mut out = String::new();
        out.push_str(&line(&self.headers));
        out.push('\n');
        out.push_str(&"-".repeat(widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1)));
        out.push('\n');
        for row in &self.rows {
            out.push_str(&line(row));
            out.push('\n');
        }
        out
    }
}

fn dash(value: Option<&str>) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or("-")
        .to_string()
}

fn date_only(value: Option<&str>) -> String {
    dash(value.map(|d| d.get(..10).unwrap_or(d)))
}

fn number(value: Option<f64>) -> String {
    value.map(|v| format!("{}", v)).unwrap_or_else(|| "-".to_string())
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print rows as JSON or through `table`, with `empty` when there are none
pub fn print_rows<T: Serialize>(
    format: OutputFormat,
    rows: &[T],
    empty: &str,
    table: impl FnOnce(&[T]) -> Table,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => print_json(rows),
        OutputFormat::Csv => anyhow::bail!("CSV output is only available for reports"),
        OutputFormat::Table if rows.is_empty() => {
            println!("{}", empty);
            Ok(())
        }
        OutputFormat::Table => {
            print!("{}", table(rows).render());
            Ok(())
        }
    }
}

pub fn students_table(rows: &[Member]) -> Table {
    let mut table = Table::new(["ID", "Name", "Class", "Section", "Mobile", "Blood Group"]);
    for m in rows {
        table.row([
            m.display_id().to_string(),
            m.name.clone(),
            dash(m.grade()),
            dash(m.section()),
            dash(m.phone.as_deref()),
            dash(m.blood_group.as_deref()),
        ]);
    }
    table
}

pub fn student_detail(m: &Member) -> Table {
    let mut table = Table::new(["Field", "Value"]);
    let address = m.primary_address();
    let contact = m.emergency_contact.as_ref();
    let fields = [
        ("Record ID", m.id.clone()),
        ("Member ID", dash(m.member_id.as_deref())),
        ("Name", m.name.clone()),
        ("Date of Birth", date_only(m.dob.as_deref())),
        ("Gender", dash(m.gender.as_deref())),
        ("Class", dash(m.grade())),
        ("Section", dash(m.section())),
        ("Mobile", dash(m.phone.as_deref())),
        ("Email", dash(m.email.as_deref())),
        ("Blood Group", dash(m.blood_group.as_deref())),
        ("Height (ft)", number(m.height_in_ft)),
        ("Weight (kg)", number(m.weight_in_kg)),
        ("Guardian", dash(contact.map(|c| c.name.as_str()))),
        ("Guardian Mobile", dash(contact.map(|c| c.phone.as_str()))),
        ("Address", dash(address.map(|a| a.description.as_str()))),
        ("PIN Code", dash(address.map(|a| a.pin_code.as_str()))),
    ];
    for (k, v) in fields {
        table.row([k.to_string(), v]);
    }
    table
}

pub fn assessments_table(rows: &[Assessment]) -> Table {
    let mut table = Table::new(["ID", "Date", "Student", "Height", "Weight", "BMI", "BP", "Oral"]);
    for a in rows {
        table.row([
            a.id.clone(),
            date_only(a.date.as_deref()),
            dash(a.student_id.name().or(Some(a.student_id.id()))),
            number(a.height),
            number(a.weight),
            number(a.bmi),
            dash(a.bp.as_deref()),
            dash(a.oral_health.as_deref()),
        ]);
    }
    table
}

pub fn assessment_detail(a: &Assessment) -> Table {
    let mut table = Table::new(["Field", "Value"]);
    let fields = [
        ("ID", a.id.clone()),
        ("Student", dash(a.student_id.name().or(Some(a.student_id.id())))),
        ("Date", date_only(a.date.as_deref())),
        ("Parent", dash(a.parent_name.as_deref())),
        ("Height (cm)", number(a.height)),
        ("Weight (kg)", number(a.weight)),
        ("BMI", number(a.bmi)),
        ("Temperature (F)", number(a.temperature)),
        ("Pulse Rate", number(a.pulse_rate)),
        ("SpO2", number(a.sp_o2)),
        ("Blood Pressure", dash(a.bp.as_deref())),
        ("Oral Health", dash(a.oral_health.as_deref())),
        ("Dental Issues", dash(a.dental_issues.as_deref())),
        ("Left Eye", dash(a.left_eye.as_deref())),
        ("Right Eye", dash(a.right_eye.as_deref())),
        ("Hearing", dash(a.hearing_comments.as_deref())),
        ("Comments", dash(a.additional_comments.as_deref())),
    ];
    for (k, v) in fields {
        table.row([k.to_string(), v]);
    }
    table
}

pub fn infirmary_table(rows: &[InfirmaryRecord]) -> Table {
    let mut table = Table::new(["ID", "Date", "Time", "Student", "Complaint", "Treatment"]);
    for r in rows {
        table.row([
            r.id.clone(),
            date_only(r.date.as_deref()),
            dash(r.time.as_deref()),
            dash(r.student_id.name().or(Some(r.student_id.id()))),
            dash(r.complaints.as_deref()),
            dash(r.treatment_given.as_deref()),
        ]);
    }
    table
}

pub fn infirmary_detail(r: &InfirmaryRecord) -> Table {
    let mut table = Table::new(["Field", "Value"]);
    let medicine = r.medicine_provided.as_ref().map(|m| {
        format!(
            "{} x {}",
            m.inventory_id.name().unwrap_or(m.inventory_id.id()),
            m.quantity
        )
    });
    let fields = [
        ("ID", r.id.clone()),
        ("Student", dash(r.student_id.name().or(Some(r.student_id.id())))),
        ("Date", date_only(r.date.as_deref())),
        ("Time", dash(r.time.as_deref())),
        ("Consent From", dash(r.consent_from.as_deref())),
        ("Complaints", dash(r.complaints.as_deref())),
        ("Details", dash(r.details.as_deref())),
        ("Treatment", dash(r.treatment_given.as_deref())),
        ("Medicine", dash(medicine.as_deref())),
    ];
    for (k, v) in fields {
        table.row([k.to_string(), v]);
    }
    table
}

pub fn inventory_table(rows: &[InventoryItem]) -> Table {
    let mut table = Table::new(["ID", "Item", "Stock", "Unit", "Status", "Expiry"]);
    for i in rows {
        table.row([
            i.id.clone(),
            i.item_name.clone(),
            i.current_stock.to_string(),
            i.unit_label().to_string(),
            i.stock_status().label().to_string(),
            date_only(i.expiry_date.as_deref()),
        ]);
    }
    table
}

pub fn nurses_table(rows: &[Nurse]) -> Table {
    let mut table = Table::new(["ID", "Name", "Email", "Phone", "School"]);
    for n in rows {
        table.row([
            n.id.clone(),
            n.name.clone(),
            dash(n.email.as_deref()),
            dash(n.phone.as_deref()),
            dash(n.school_name().or(n.school_id())),
        ]);
    }
    table
}

pub fn nurse_detail(n: &Nurse) -> Table {
    let mut table = Table::new(["Field", "Value"]);
    let fields = [
        ("ID", n.id.clone()),
        ("Name", n.name.clone()),
        ("Email", dash(n.email.as_deref())),
        ("Phone", dash(n.phone.as_deref())),
        ("Gender", dash(n.gender.as_deref())),
        ("Date of Birth", date_only(n.dob.as_deref())),
        ("School", dash(n.school_name().or(n.school_id()))),
        ("Languages", dash(Some(n.languages_spoken.join(", ").as_str()))),
        ("Introduction", dash(n.introduction.as_deref())),
    ];
    for (k, v) in fields {
        table.row([k.to_string(), v]);
    }
    table
}

pub fn stats_table(stats: &NurseStats) -> Table {
    let mut table = Table::new(["Students", "Assessments", "Infirmary Visits"]);
    table.row([
        stats.students.to_string(),
        stats.assessments.to_string(),
        stats.infirmaries.to_string(),
    ]);
    table
}

pub fn reports_table(rows: &[ReportRow]) -> Table {
    let mut table = Table::new(["Date", "Student", "Student ID", "Complaints", "Consent", "Treatment"]);
    for r in rows {
        table.row([
            r.date.clone(),
            r.name.clone(),
            r.student_id.clone(),
            r.complaints.clone(),
            r.consent_from.clone(),
            r.treatment.clone(),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_alignment() {
        let mut table = Table::new(["ID", "Name"]);
        table.row(["1", "Asha Rao"]);
        table.row(["100", "Ravi"]);

        let rendered = table.render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "ID   Name");
        assert_eq!(lines[1], "-".repeat(13));
        assert_eq!(lines[2], "1    Asha Rao");
        assert_eq!(lines[3], "100  Ravi");
    }

    #[test]
    fn test_inventory_rows_show_status() {
        let item: InventoryItem = serde_json::from_value(serde_json::json!({
            "_id": "i1", "item_name": "Paracetamol", "current_stock": 4
        }))
        .unwrap();
        let rendered = inventory_table(&[item]).render();
        assert!(rendered.contains("Low Stock"));
        assert!(rendered.contains("tablets"));
    }
}
