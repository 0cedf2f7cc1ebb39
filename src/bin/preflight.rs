use taqueria_backend::infra::{AppConfig, SmtpMailer};
use taqueria_backend::storage::{PgStore, UserStore};

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run --bin preflight -- [--create-schema]\n\
         \n\
         Requires env vars:\n\
           DATABASE_URL, JWT_SECRET\n\
         Checked when set:\n\
           SMTP_HOST, SMTP_PORT, SMTP_USER, SMTP_PASS, SMTP_FROM, CATERING_INBOX\n"
    );
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }

    let create_schema = args.iter().any(|a| a == "--create-schema");

    // Force-read config (nice error messages if missing)
    let config = AppConfig::from_env()?;

    println!("> Preflight:");
    println!("  PORT={}", config.port);
    println!("  FRONTEND_URL={}", config.frontend_origins.join(","));
    println!("  BCRYPT_COST={}", config.bcrypt_cost);
    println!("  TOKEN_TTL={}h", config.token_ttl.num_hours());

    // Database connectivity
    let store = PgStore::connect(&config.database_url, 1).await?;
    store.ping().await?;
    println!("  Database reachable.");

    // Tables
    let missing = store.missing_tables().await?;
    if missing.is_empty() {
        println!("  Tables present.");
    } else if create_schema {
        println!("  Missing tables {:?} -> creating...", missing);
        store.ensure_schema().await?;
        let still_missing = store.missing_tables().await?;
        if !still_missing.is_empty() {
            return Err(anyhow::anyhow!(
                "Tables still missing after create: {:?}",
                still_missing
            ));
        }
        println!("  Schema created successfully.");
    } else {
        return Err(anyhow::anyhow!(
            "Missing tables {:?}. Re-run with --create-schema",
            missing
        ));
    }

    // SMTP
    match SmtpMailer::new(&config.smtp) {
        Ok(mailer) => match mailer.test_connection().await {
            Ok(true) => println!("  SMTP {}:{} reachable.", config.smtp.host, config.smtp.port),
            Ok(false) => eprintln!(
                "  Warning: SMTP {}:{} refused the connection; verification mail will fail.",
                config.smtp.host, config.smtp.port
            ),
            Err(e) => eprintln!("  Warning: SMTP check failed: {}", e),
        },
        Err(e) => eprintln!("  Warning: SMTP not configured: {}", e),
    }

    match &config.catering_inbox {
        Some(inbox) => println!("  Catering inquiries go to {}.", inbox),
        None => eprintln!("  Warning: no catering inbox; POST /catering/inquiries returns 503."),
    }

    println!("> Preflight OK.");
    Ok(())
}
