//! Equality Corp - interactive hiring desk
//!
//! Reads commands from stdin and renders session events as plain text.

use std::fs;
use std::io::{self, Write};

use equality_corp::cases::CaseRecord;
use equality_corp::core::error::Result;
use equality_corp::progression::Phase;
use equality_corp::{Decision, GameConfig, GameSession, SessionEvent, SessionSnapshot};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("equality_corp=info")),
        )
        .init();

    let seed: u64 = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(rand::random);
    let mut session = GameSession::with_builtin_content(GameConfig::default(), seed)?;

    tracing::info!(seed, "Equality Corp desk opened");

    println!("\n=== EQUALITY CORP :: HIRING DESK ===");
    print_help();

    loop {
        render_events(&mut session);
        print_prompt(&session);

        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        if input == "quit" || input == "q" {
            break;
        }

        if input == "help" || input == "h" {
            print_help();
            continue;
        }

        if input == "status" || input == "s" {
            display_status(&session);
            continue;
        }

        if input == "rules" {
            display_rules(&session);
            continue;
        }

        if input == "inbox" {
            display_inbox(&session);
            continue;
        }

        if let Some(id) = input.strip_prefix("read ") {
            if let Some(entry) = session.inbox().emails.iter().find(|e| e.email.id == id.trim()) {
                let email = entry.email.clone();
                println!();
                println!("From: {} ({})", email.sender, email.sender_title);
                println!("Subject: {}", email.subject);
                println!();
                println!("{}", email.body);
            }
            session.read_email(id.trim());
            continue;
        }

        if let Some(path) = input.strip_prefix("save ") {
            let snapshot = session.snapshot();
            match snapshot.to_json() {
                Ok(json) => match fs::write(path.trim(), json) {
                    Ok(()) => println!(
                        "Saved to {} (resumes at the start of day {})",
                        path.trim(),
                        snapshot.current_day
                    ),
                    Err(e) => println!("Could not save: {}", e),
                },
                Err(e) => println!("Could not save: {}", e),
            }
            continue;
        }

        if let Some(path) = input.strip_prefix("load ") {
            let loaded = fs::read_to_string(path.trim())
                .map_err(Into::into)
                .and_then(|json| SessionSnapshot::from_json(&json))
                .and_then(|snapshot| session.load_snapshot(&snapshot));
            match loaded {
                Ok(()) => println!("Loaded day {}", session.day()),
                Err(e) => println!("Could not load: {}", e),
            }
            continue;
        }

        if input == "a" || input == "approve" || input == "r" || input == "reject" {
            let decision = if input.starts_with('a') {
                Decision::Approve
            } else {
                Decision::Reject
            };
            match session.submit_decision(decision) {
                Ok(adjudication) => {
                    let verdict = if adjudication.correct { "Correct" } else { "Incorrect" };
                    println!(
                        "{}: expected {} ({})",
                        verdict,
                        adjudication.canonical.as_str(),
                        adjudication.reason
                    );
                }
                Err(e) => println!("{}", e),
            }
            continue;
        }

        if input == "next" || input == "n" {
            if let Err(e) = session.advance_phase() {
                println!("{}", e);
            }
            continue;
        }

        if input == "day" || input == "d" {
            if let Err(e) = session.advance_day() {
                println!("{}", e);
            }
            continue;
        }

        if input == "new" {
            session.start_new_session();
            println!("New session started.");
            continue;
        }

        println!("Unknown command. Type 'help' for the command list.");
    }

    let stats = session.ending_statistics();
    println!(
        "\nDesk closed after {} day(s). Balance: {} KRW.",
        stats.days_worked, stats.final_balance
    );
    Ok(())
}

fn print_help() {
    println!("Commands:");
    println!("  next / n        - Advance one phase");
    println!("  day / d         - Advance until the next stop in the day");
    println!("  a / r           - Approve or reject the current case");
    println!("  inbox           - List today's emails");
    println!("  read <id>       - Read an email");
    println!("  rules           - List today's active rules");
    println!("  status / s      - Show reputation and finances");
    println!("  save <path>     - Write the last end-of-day save");
    println!("  load <path>     - Resume from a snapshot");
    println!("  new             - Start over");
    println!("  quit / q        - Exit");
    println!();
}

fn print_prompt(session: &GameSession) {
    match session.phase() {
        Phase::DocumentReview => {
            let today = session.progression().today();
            println!(
                "[Day {} | {}/{} processed] approve (a) or reject (r)",
                session.day(),
                today.processed,
                session.progression().target()
            );
        }
        Phase::Ending => {
            if let Some(text) = session.ending_text() {
                println!("[{}] type 'new' to play again or 'quit'", text.title);
            }
        }
        phase => println!("[Day {} | {:?}] 'next' to continue", session.day(), phase),
    }
}

fn render_events(session: &mut GameSession) {
    for event in session.drain_events() {
        match event {
            SessionEvent::PhaseChanged { to: Phase::DayStart, day, .. } => {
                println!("\n========== DAY {} ==========", day);
            }
            SessionEvent::PhaseChanged { .. } => {}
            SessionEvent::EmailsReceived { count, has_mandatory, .. } => {
                println!("\nYou have {} new email(s).", count);
                if has_mandatory {
                    println!("A mandatory guideline is waiting. Type 'inbox' to list emails.");
                }
            }
            SessionEvent::EmailRead { .. } => {}
            SessionEvent::CasePresented { record } => display_case(&record),
            SessionEvent::CaseAdjudicated { .. } => {}
            SessionEvent::ReputationChanged { axis, value } => {
                println!("  {:?} -> {}", axis, value);
            }
            SessionEvent::SalaryPaid { day, amount, accuracy } => {
                println!("\n--- Daily report, day {} ---", day);
                println!("Accuracy: {:.0}%", accuracy * 100.0);
                println!("Salary: {} KRW", amount);
            }
            SessionEvent::Settlement { expense, bonus, balance } => {
                println!("\n--- Monthly settlement ---");
                println!("Household expenses: {} KRW", expense);
                if let Some(bonus) = bonus {
                    println!("Performance bonus: {} KRW", bonus);
                }
                println!("Balance: {} KRW", balance);
            }
            SessionEvent::InnerThought { text, .. } => {
                println!("\n(On the way home...)");
                println!("{}", text);
            }
            SessionEvent::FamilyDialogue { spouse, daughter, .. } => {
                println!("\nSpouse: {}", spouse);
                println!("Daughter: {}", daughter);
                println!("({})", session.relationship_status());
            }
            SessionEvent::SnapshotSaved { snapshot } => {
                println!("Day saved. Resume day: {}", snapshot.current_day);
            }
            SessionEvent::EndingSelected { .. } => display_ending(session),
        }
    }
}

fn display_case(record: &CaseRecord) {
    println!();
    println!("+-- Applicant {} --", record.id);
    println!("| Name:        {} ({:?}, {})", record.full_name, record.gender, record.age);
    println!("| Region:      {}", record.region.as_str());
    println!("| Address:     {}", record.address);
    println!("| Phone:       {}", record.phone);
    println!(
        "| University:  {} [{}], {} ({})",
        record.university,
        record.university_tier.as_str(),
        record.major,
        record.graduation_year
    );
    println!("| GPA:         {:.2}", record.gpa);
    println!(
        "| Career:      {} / {} ({})",
        record.previous_company,
        record.position,
        record.experience_duration()
    );
    if let Some(check) = &record.background_check {
        let verdict = if check.has_criminal_record { "RECORD FOUND" } else { "clear" };
        println!("| Background:  {}", verdict);
    }
    if let Some(recommendation) = &record.recommendation {
        println!("| Reference:   {}", recommendation);
    }
    if let Some(certification) = &record.certification {
        println!("| Certificate: {}", certification);
    }
    println!("+--");
}

fn display_status(session: &GameSession) {
    let reputation = session.reputation();
    let economy = session.economy();
    println!();
    println!("Day {} of {} ({:?})", session.day(), session.config().total_days, session.phase());
    println!("Loyalty:    {}", reputation.loyalty());
    println!("Conscience: {}", reputation.conscience());
    println!("Inequality: {}", reputation.inequality());
    println!("Mood:       {:?}", session.mood());
    println!("Balance:    {} KRW ({})", economy.balance(), economy.status().label());
    println!(
        "Accuracy:   {:.1}%",
        session.progression().cumulative().accuracy() * 100.0
    );
}

fn display_rules(session: &GameSession) {
    let rules = session.active_rules();
    if rules.is_empty() {
        println!("No rules in force today.");
        return;
    }
    for rule in rules {
        println!("[{:?}] {} - {}", rule.rule_type, rule.name, rule.description);
    }
}

fn display_inbox(session: &GameSession) {
    let inbox = session.inbox();
    if inbox.is_empty() {
        println!("Inbox is empty.");
        return;
    }
    for entry in &inbox.emails {
        let marker = if entry.read { " " } else { "*" };
        let mandatory = if entry.email.mandatory { " [mandatory]" } else { "" };
        println!(
            "{} {} | {} | {}{}",
            marker, entry.email.id, entry.email.sender, entry.email.subject, mandatory
        );
    }
}

fn display_ending(session: &GameSession) {
    let stats = session.ending_statistics();
    println!("\n==============================");
    if let Some(text) = session.ending_text() {
        println!("{}", text.title);
        println!();
        println!("{}", text.story);
        println!();
        println!("{}", text.summary);
        println!("\"{}\"", text.message);
    }
    println!("\nFinal loyalty:    {}", stats.final_loyalty);
    println!("Final conscience: {}", stats.final_conscience);
    println!("Inequality:       {}", stats.final_inequality);
    println!("Total earnings:   {} KRW", stats.total_earnings);
    println!("Final balance:    {} KRW", stats.final_balance);
    println!("==============================");
}
