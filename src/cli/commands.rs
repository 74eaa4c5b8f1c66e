//! Command handlers

use std::future::Future;
use std::path::Path;

use anyhow::{bail, Context as _};
use tracing::{info, warn};

use super::context::Context;
use super::output::{self, print_json, print_rows, OutputFormat};
use super::{
    AssessmentArgs, AssessmentCommand, Commands, Cli, InfirmaryArgs, InfirmaryCommand,
    InventoryArgs, InventoryCommand, NurseCommand, PageArgs, PasswordCommand, ReportArgs,
    StudentArgs, StudentCommand,
};
use crate::auth_flow::{ResetWizard, WizardStep};
use crate::config::{generate_default_config, Config};
use crate::error::ClientResult;
use crate::forms::upload::content_type_for;
use crate::forms::{
    self, sanitize_mobile_input, AssessmentForm, InfirmaryForm, InventoryForm, StudentForm,
};
use crate::listing::{filter_rows, ListState, PendingDelete};
use crate::model::{
    AssessmentQuery, Credentials, InfirmaryQuery, InventoryQuery, MemberQuery, NurseQuery,
};
use crate::reports::{self, ReportFilters};
use crate::services::{self, assessments, infirmary, inventory, media, members, nurses, LoginOutcome};

pub async fn dispatch(cli: Cli, config: Config) -> anyhow::Result<()> {
    // Config generation works without a backend
    if let Commands::Config { output } = &cli.command {
        return write_config(output.as_deref());
    }

    let ctx = Context::new(&config, cli.format, cli.yes)?;

    match cli.command {
        Commands::Login { email, password } => login(&ctx, email, password).await,
        Commands::Logout => {
            services::auth::logout(&ctx.client)?;
            println!("Logged out");
            Ok(())
        }
        Commands::Whoami => whoami(&ctx).await,
        Commands::Password { command } => password(&ctx, command).await,
        Commands::Stats => {
            ctx.require_login()?;
            let stats = nurses::stats(&ctx.client).await?;
            match ctx.format {
                OutputFormat::Json => print_json(&stats),
                _ => {
                    print!("{}", output::stats_table(&stats).render());
                    Ok(())
                }
            }
        }
        Commands::Students { command } => students(&ctx, command).await,
        Commands::Assessments { command } => assessments_cmd(&ctx, command).await,
        Commands::Infirmary { command } => infirmary_cmd(&ctx, command).await,
        Commands::Inventory { command } => inventory_cmd(&ctx, command).await,
        Commands::Nurses { command } => nurses_cmd(&ctx, command).await,
        Commands::Reports(args) => report(&ctx, args).await,
        Commands::Upload { path } => upload(&ctx, &path).await,
        Commands::Pincode { pin } => pincode(&ctx, &pin).await,
        Commands::Config { .. } => Ok(()),
    }
}

fn write_config(output: Option<&Path>) -> anyhow::Result<()> {
    let config = generate_default_config();

    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, &config)?;
            println!("Config written to {:?}", path);
        }
        None => print!("{}", config),
    }
    Ok(())
}

async fn login(ctx: &Context, email: String, password: Option<String>) -> anyhow::Result<()> {
    let password = match password.or_else(|| std::env::var("AHANA_PASSWORD").ok()) {
        Some(p) => p,
        None => ctx.prompt("Password")?,
    };
    let credentials = Credentials { email, password };

    match services::auth::login(&ctx.client, &credentials).await? {
        LoginOutcome::Authenticated(user) => {
            println!("Logged in as {}", user.email);
            match nurses::current_session(&ctx.client).await {
                Ok(Some(nurse)) => println!(
                    "Nurse: {} ({})",
                    nurse.display_name(),
                    nurse.nurse.school_name().unwrap_or("no school linked")
                ),
                Ok(None) => {}
                Err(e) => warn!("Could not load nurse profile: {}", e),
            }
        }
        LoginOutcome::PasswordResetRequired { user, token } => {
            ResetWizard::from_login(ctx.client.session(), &user.email, &token)?;
            println!("A new password is required before you can continue.");
            println!("Run: ahana password set --password <new> --confirm <new>");
        }
    }
    Ok(())
}

async fn whoami(ctx: &Context) -> anyhow::Result<()> {
    let nurse = ctx.nurse().await?;
    match ctx.format {
        OutputFormat::Json => print_json(&nurse.nurse),
        _ => {
            println!("{} <{}>", nurse.display_name(), nurse.user.email);
            println!("Nurse ID: {}", nurse.nurse_id());
            println!("School:   {}", nurse.nurse.school_name().or(nurse.school_id()).unwrap_or("-"));
            Ok(())
        }
    }
}

async fn password(ctx: &Context, command: PasswordCommand) -> anyhow::Result<()> {
    let session = ctx.client.session();

    match command {
        PasswordCommand::Forgot { email } => {
            let mut wizard = ResetWizard::new();
            wizard.email = email;
            wizard.submit_request()?;
            if !ctx.confirm(&format!("Send a temporary password to {}?", wizard.email))? {
                wizard.cancel_request();
                println!("Cancelled");
                return Ok(());
            }
            wizard.confirm_request(&ctx.client).await?;
            println!("{}", wizard.success.unwrap_or_default());
            println!("Next: ahana password verify --email <email> --temp-password <password>");
        }
        PasswordCommand::Verify {
            email,
            temp_password,
        } => {
            let mut wizard = ResetWizard::new();
            wizard.step = WizardStep::Verify;
            wizard.email = email;
            wizard.temp_password = temp_password;
            wizard.verify(&ctx.client).await?;
            println!("{}", wizard.success.unwrap_or_default());
        }
        PasswordCommand::Set {
            password,
            confirm,
            token,
        } => {
            let mut wizard = match token {
                Some(token) => ResetWizard::from_login(session, "", &token)?,
                None => {
                    let mut wizard = ResetWizard::new();
                    wizard.step = WizardStep::SetPassword;
                    wizard
                }
            };
            wizard.new_password = password;
            wizard.confirm_password = confirm;
            wizard.set_password(&ctx.client).await?;
            println!("{}", wizard.success.unwrap_or_default());
        }
    }
    Ok(())
}

/// Fetch from `paging.page`, following pages when `--all` is set
async fn collect_pages<T, F, Fut>(
    label: &str,
    paging: &PageArgs,
    mut fetch: F,
) -> anyhow::Result<ListState<T>>
where
    F: FnMut(u32, u32) -> Fut,
    Fut: Future<Output = ClientResult<Vec<T>>>,
{
    let mut list = ListState::new(paging.limit);
    let mut page = paging.page.max(1);

    loop {
        list.begin(page);
        list.settle(page, fetch(page, list.limit()).await);

        if let Some(error) = list.error() {
            if list.is_empty() {
                bail!("Failed to fetch {}: {}", label, error);
            }
            warn!("Stopped after page {}: {}", page, error);
            break;
        }
        match list.next_page() {
            Some(next) if paging.all => page = next,
            _ => break,
        }
    }
    Ok(list)
}

/// Confirm, then delete exactly once
async fn delete_confirmed<F, Fut>(ctx: &Context, label: &str, id: &str, delete: F) -> anyhow::Result<()>
where
    F: FnOnce(String) -> Fut,
    Fut: Future<Output = ClientResult<Option<String>>>,
{
    let mut pending = PendingDelete::default();
    pending.request(id);

    if !ctx.confirm(&format!("Delete {} {}?", label, id))? {
        pending.cancel();
        println!("Cancelled");
        return Ok(());
    }

    if let Some(id) = pending.confirm(delete).await? {
        println!("Deleted {} {}", label, id);
    }
    Ok(())
}

fn set(target: &mut String, value: Option<String>) {
    if let Some(value) = value {
        *target = value;
    }
}

async fn fill_student_form(ctx: &Context, form: &mut StudentForm, args: StudentArgs) {
    set(&mut form.name, args.name);
    set(&mut form.date_of_birth, args.dob);
    set(&mut form.gender, args.gender);
    set(&mut form.mobile, args.mobile.map(|m| sanitize_mobile_input(&m)));
    set(
        &mut form.alternate_mobile,
        args.alternate_mobile.map(|m| sanitize_mobile_input(&m)),
    );
    set(&mut form.email, args.email);
    set(&mut form.class, args.class);
    set(&mut form.section, args.section);
    set(&mut form.blood_group, args.blood_group);
    set(&mut form.guardian_name, args.guardian_name);
    set(
        &mut form.guardian_mobile,
        args.guardian_mobile.map(|m| sanitize_mobile_input(&m)),
    );
    set(&mut form.guardian_relation, args.guardian_relation);
    set(&mut form.height_in_ft, args.height_ft);
    set(&mut form.weight_in_kg, args.weight_kg);
    set(&mut form.profile_pic, args.profile_pic);
    set(&mut form.address.description, args.address);
    set(&mut form.address.landmark, args.landmark);

    if let Some(pin) = args.pin_code {
        form.address.pin_code = pin.clone();
        if forms::is_pin_code(&pin) {
            match services::common::pincode(&ctx.client, &pin).await {
                Ok(lookup) if !lookup.is_empty() => form.apply_pincode(&lookup),
                Ok(_) => warn!("No regions found for PIN {}", pin),
                Err(e) => warn!("PIN lookup failed: {}", e),
            }
        }
    }
}

async fn students(ctx: &Context, command: StudentCommand) -> anyhow::Result<()> {
    let nurse = ctx.nurse().await?;
    let school_id = nurse.require_school()?;

    match command {
        StudentCommand::List {
            search,
            class,
            section,
            matching,
            paging,
        } => {
            let list = collect_pages("students", &paging, |page, limit| {
                let query = MemberQuery {
                    search: search.clone(),
                    grade: class.clone(),
                    section: section.clone(),
                    ..MemberQuery::students(school_id, page, limit)
                };
                let client = &ctx.client;
                async move { members::list(client, &query).await }
            })
            .await?;

            let rows: Vec<_> = filter_rows(list.rows(), matching.as_deref().unwrap_or(""))
                .into_iter()
                .cloned()
                .collect();
            print_rows(ctx.format, &rows, "No students found", output::students_table)?;
            if list.has_more() && !paging.all {
                eprintln!("More results: --page {} (or --all)", list.page() + 1);
            }
            Ok(())
        }
        StudentCommand::Show { id } => {
            let member = members::get(&ctx.client, &id).await?;
            match ctx.format {
                OutputFormat::Json => print_json(&member),
                _ => {
                    print!("{}", output::student_detail(&member).render());
                    Ok(())
                }
            }
        }
        StudentCommand::Add(args) => {
            let mut form = StudentForm::default();
            fill_student_form(ctx, &mut form, args).await;
            let member = forms::student::save(&ctx.client, &form, school_id, None).await?;
            println!("Student added: {} ({})", member.name, member.display_id());
            Ok(())
        }
        StudentCommand::Update { id, fields } => {
            let existing = members::get(&ctx.client, &id).await?;
            let mut form = StudentForm::from_member(&existing);
            fill_student_form(ctx, &mut form, fields).await;
            let member = forms::student::save(&ctx.client, &form, school_id, Some(&id)).await?;
            println!("Student updated: {}", member.name);
            Ok(())
        }
    }
}

fn assessment_form(args: AssessmentArgs) -> (String, AssessmentForm) {
    let mut form = AssessmentForm::today();
    set(&mut form.date, args.date);
    set(&mut form.parent_name, args.parent_name);
    form.height = args.height;
    form.weight = args.weight;
    set(&mut form.bmi, args.bmi);
    form.temperature = args.temperature;
    form.pulse_rate = args.pulse_rate;
    form.sp_o2 = args.spo2;
    set(&mut form.bp, args.bp);
    set(&mut form.oral_health, args.oral_health);
    set(&mut form.dental_issues, args.dental_issues);
    set(&mut form.left_eye, args.left_eye);
    set(&mut form.right_eye, args.right_eye);
    set(&mut form.hearing_comments, args.hearing);
    set(&mut form.additional_comments, args.comments);
    (args.student, form)
}

async fn assessments_cmd(ctx: &Context, command: AssessmentCommand) -> anyhow::Result<()> {
    match command {
        AssessmentCommand::List {
            student,
            search,
            class,
            section,
            from,
            to,
            paging,
        } => {
            let nurse = ctx.nurse().await?;
            let school_id = nurse.school_id().map(str::to_string);
            let list = collect_pages("assessments", &paging, |page, limit| {
                let query = AssessmentQuery {
                    student_id: student.clone(),
                    school_id: school_id.clone(),
                    search: search.clone(),
                    grade: class.clone(),
                    section: section.clone(),
                    from_date: from.clone(),
                    to_date: to.clone(),
                    page: Some(page),
                    limit: Some(limit),
                };
                let client = &ctx.client;
                async move { assessments::list(client, &query).await }
            })
            .await?;
            print_rows(ctx.format, list.rows(), "No assessments found", output::assessments_table)
        }
        AssessmentCommand::Show { id } => {
            ctx.require_login()?;
            let assessment = assessments::get(&ctx.client, &id).await?;
            match ctx.format {
                OutputFormat::Json => print_json(&assessment),
                _ => {
                    print!("{}", output::assessment_detail(&assessment).render());
                    Ok(())
                }
            }
        }
        AssessmentCommand::Add(args) => {
            let nurse = ctx.nurse().await?;
            let (student, form) = assessment_form(args);
            let saved =
                forms::assessment::save(&ctx.client, &form, &student, nurse.school_id(), None)
                    .await?;
            println!("Assessment saved: {}", saved.id);
            Ok(())
        }
        AssessmentCommand::Delete { id } => {
            ctx.require_login()?;
            let client = &ctx.client;
            delete_confirmed(ctx, "assessment", &id, |id| async move {
                assessments::delete(client, &id).await
            })
            .await
        }
    }
}

fn infirmary_form(args: InfirmaryArgs) -> (String, InfirmaryForm) {
    let mut form = InfirmaryForm::now();
    form.consent_from = args.consent;
    form.complaints = args.complaint;
    set(&mut form.other_complaint, args.other);
    set(&mut form.details, args.details);
    set(&mut form.treatment, args.treatment);
    form.tablet = args.tablet.filter(|t| !t.trim().is_empty());
    set(&mut form.quantity, args.quantity);
    set(&mut form.consent_date, args.date);
    set(&mut form.consent_time, args.time);
    (args.student, form)
}

async fn infirmary_cmd(ctx: &Context, command: InfirmaryCommand) -> anyhow::Result<()> {
    match command {
        InfirmaryCommand::List {
            student,
            search,
            paging,
        } => {
            let nurse = ctx.nurse().await?;
            let school_id = nurse.school_id().map(str::to_string);
            let list = collect_pages("infirmary records", &paging, |page, limit| {
                let query = InfirmaryQuery {
                    student_id: student.clone(),
                    school_id: school_id.clone(),
                    search: search.clone(),
                    page,
                    limit,
                    ..InfirmaryQuery::default()
                };
                let client = &ctx.client;
                async move { infirmary::list(client, &query).await }
            })
            .await?;
            print_rows(ctx.format, list.rows(), "No infirmary records found", output::infirmary_table)
        }
        InfirmaryCommand::Show { id } => {
            ctx.require_login()?;
            let record = infirmary::get(&ctx.client, &id).await?;
            match ctx.format {
                OutputFormat::Json => print_json(&record),
                _ => {
                    print!("{}", output::infirmary_detail(&record).render());
                    Ok(())
                }
            }
        }
        InfirmaryCommand::Add(args) => {
            let nurse = ctx.nurse().await?;
            let (student, form) = infirmary_form(args);
            let record = forms::infirmary::submit(&ctx.client, &form, &student, &nurse).await?;
            println!("Infirmary record saved: {}", record.id);
            Ok(())
        }
        InfirmaryCommand::Delete { id } => {
            ctx.require_login()?;
            let client = &ctx.client;
            delete_confirmed(ctx, "infirmary record", &id, |id| async move {
                infirmary::delete(client, &id).await
            })
            .await
        }
    }
}

fn fill_inventory_form(form: &mut InventoryForm, args: InventoryArgs) {
    set(&mut form.item_name, args.name);
    set(&mut form.current_stock, args.stock);
    set(&mut form.expiry_date, args.expiry);
    set(&mut form.unit, args.unit);
}

async fn inventory_cmd(ctx: &Context, command: InventoryCommand) -> anyhow::Result<()> {
    let nurse = ctx.nurse().await?;
    let school_id = nurse.school_id();

    match command {
        InventoryCommand::List {
            search,
            status,
            expiring_before,
        } => {
            let query = InventoryQuery {
                school_id: school_id.map(str::to_string),
                search,
                stock_status: status,
                expiry_before: expiring_before,
            };
            let items = inventory::list(&ctx.client, &query)
                .await
                .context("Failed to fetch inventory")?;
            print_rows(ctx.format, &items, "No inventory items found", output::inventory_table)
        }
        InventoryCommand::Show { id } => {
            let item = inventory::get(&ctx.client, &id).await?;
            match ctx.format {
                OutputFormat::Json => print_json(&item),
                _ => {
                    print!("{}", output::inventory_table(std::slice::from_ref(&item)).render());
                    Ok(())
                }
            }
        }
        InventoryCommand::Add(args) => {
            let mut form = InventoryForm::default();
            fill_inventory_form(&mut form, args);
            let item = forms::inventory::save(&ctx.client, &form, school_id, None).await?;
            println!("Inventory item added: {} ({})", item.item_name, item.id);
            Ok(())
        }
        InventoryCommand::Update { id, fields } => {
            let existing = inventory::get(&ctx.client, &id).await?;
            let mut form = InventoryForm::from_item(&existing);
            fill_inventory_form(&mut form, fields);
            let item = forms::inventory::save(&ctx.client, &form, school_id, Some(&id)).await?;
            println!("Inventory item updated: {} (stock {})", item.item_name, item.current_stock);
            Ok(())
        }
        InventoryCommand::Delete { id } => {
            let client = &ctx.client;
            delete_confirmed(ctx, "inventory item", &id, |id| async move {
                inventory::delete(client, &id).await
            })
            .await
        }
    }
}

async fn nurses_cmd(ctx: &Context, command: NurseCommand) -> anyhow::Result<()> {
    ctx.require_login()?;

    match command {
        NurseCommand::List { search, paging } => {
            let list = collect_pages("nurses", &paging, |page, limit| {
                let query = NurseQuery {
                    page,
                    limit,
                    search: search.clone(),
                };
                let client = &ctx.client;
                async move { nurses::list(client, &query).await }
            })
            .await?;
            print_rows(ctx.format, list.rows(), "No nurses found", output::nurses_table)
        }
        NurseCommand::Show { id } => {
            let nurse = nurses::get(&ctx.client, &id).await?;
            match ctx.format {
                OutputFormat::Json => print_json(&nurse),
                _ => {
                    print!("{}", output::nurse_detail(&nurse).render());
                    Ok(())
                }
            }
        }
    }
}

async fn report(ctx: &Context, args: ReportArgs) -> anyhow::Result<()> {
    let nurse = ctx.nurse().await?;
    let filters = ReportFilters {
        class: args.class.unwrap_or_default(),
        section: args.section.unwrap_or_default(),
        student_id: args.student_id.unwrap_or_default(),
        name: args.name.unwrap_or_default(),
        from_date: args.from.unwrap_or_default(),
        to_date: args.to.unwrap_or_default(),
    };
    let search = args.search.unwrap_or_default();

    let rows = reports::fetch(&ctx.client, &filters, nurse.school_id(), &search).await?;
    info!(rows = rows.len(), filters = filters.active().len(), "Report fetched");

    match (ctx.format, args.output) {
        (OutputFormat::Csv, Some(path)) => {
            let file = std::fs::File::create(&path)
                .with_context(|| format!("Cannot create {:?}", path))?;
            reports::write_csv(&rows, file)?;
            println!("Exported {} rows to {:?}", rows.len(), path);
            Ok(())
        }
        (OutputFormat::Csv, None) => {
            reports::write_csv(&rows, std::io::stdout().lock())?;
            Ok(())
        }
        (format, _) => print_rows(format, &rows, "No report records found", output::reports_table),
    }
}

async fn upload(ctx: &Context, path: &Path) -> anyhow::Result<()> {
    ctx.require_login()?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .context("Upload path has no file name")?;
    let Some(content_type) = content_type_for(&file_name) else {
        bail!("Please upload a valid image file (JPEG, PNG, GIF, or WebP)");
    };
    let bytes = std::fs::read(path).with_context(|| format!("Cannot read {:?}", path))?;

    let uploaded = media::upload(&ctx.client, &file_name, content_type, bytes).await?;
    match ctx.format {
        OutputFormat::Json => print_json(&uploaded),
        _ => {
            println!("{}", uploaded.url);
            Ok(())
        }
    }
}

async fn pincode(ctx: &Context, pin: &str) -> anyhow::Result<()> {
    let lookup = services::common::pincode(&ctx.client, pin).await?;
    if lookup.is_empty() {
        println!("No regions found for PIN {}", pin);
        return Ok(());
    }
    match ctx.format {
        OutputFormat::Json => print_json(&lookup.regions),
        _ => {
            let mut table = output::Table::new(["Region", "District", "State"]);
            for office in &lookup.regions {
                table.row([office.name.clone(), office.district.clone(), office.state.clone()]);
            }
            print!("{}", table.render());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assessment_form_from_args() {
        let args = AssessmentArgs {
            student: "s1".into(),
            height: "140".into(),
            weight: "35".into(),
            temperature: "98.6".into(),
            pulse_rate: "80".into(),
            spo2: "99".into(),
            bp: Some("110/70".into()),
            oral_health: Some("good".into()),
            ..AssessmentArgs::default()
        };
        let (student, form) = assessment_form(args);
        assert_eq!(student, "s1");
        assert_eq!(form.sp_o2, "99");
        assert!(!form.date.is_empty());
        assert!(form.validate().is_empty());
    }

    #[test]
    fn test_infirmary_form_from_args() {
        let args = InfirmaryArgs {
            student: "s1".into(),
            consent: "Parent".into(),
            complaint: "Fever".into(),
            tablet: Some(" ".into()),
            date: Some("2024-03-05".into()),
            ..InfirmaryArgs::default()
        };
        let (_, form) = infirmary_form(args);
        assert_eq!(form.consent_date, "2024-03-05");
        assert!(form.tablet.is_none());
        assert!(!form.consent_time.is_empty());
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_inventory_args_overlay() {
        let mut form = InventoryForm {
            item_name: "Paracetamol".into(),
            current_stock: "20".into(),
            ..InventoryForm::default()
        };
        fill_inventory_form(
            &mut form,
            InventoryArgs {
                stock: Some("15".into()),
                ..InventoryArgs::default()
            },
        );
        assert_eq!(form.item_name, "Paracetamol");
        assert_eq!(form.current_stock, "15");
    }
}
