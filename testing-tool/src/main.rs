use anyhow::{bail, Context, Result};
use colored::*;
use reqwest::{Client, Method};
use serde_json::{json, Value};
use std::io::{self, Write};

const STATUSES: [&str; 5] = ["AWAITING", "WASHING", "FINISHING", "READY", "DELIVERED"];

struct Session {
    client: Client,
    base_url: String,
    token: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    println!("{}", "🚿 Lava-jato Testing Tool".bright_blue().bold());
    println!("{}", "=====================================".bright_blue());
    println!();

    let session = connect().await?;

    loop {
        println!();
        println!("{}", "📋 MENÚ PRINCIPAL".bright_green().bold());
        println!("{}", "==================".bright_green());
        println!("1. 📋 Ver tablero");
        println!("2. 🧾 Crear orden de prueba");
        println!("3. 🔄 Cambiar estado de una orden");
        println!("4. 📜 Ver historial de una orden");
        println!("5. 🚪 Salir");
        let choice = prompt("Selecciona una opción (1-5): ")?;

        let result = match choice.as_str() {
            "1" => show_board(&session).await,
            "2" => create_demo_order(&session).await,
            "3" => move_order(&session).await,
            "4" => show_history(&session).await,
            "5" => {
                println!("{}", "👋 ¡Hasta luego!".bright_green());
                break;
            }
            _ => {
                println!("{}", "❌ Opción inválida. Intenta de nuevo.".bright_red());
                Ok(())
            }
        };

        if let Err(e) = result {
            println!("{} {}", "❌".bright_red(), e.to_string().bright_red());
        }
    }

    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    print!("{}", label.bright_yellow());
    io::stdout().flush()?;
    let mut value = String::new();
    io::stdin().read_line(&mut value)?;
    Ok(value.trim().to_string())
}

async fn connect() -> Result<Session> {
    println!("{}", "🔐 CONEXIÓN".bright_cyan().bold());
    println!("{}", "===========".bright_cyan());

    let mut base_url = prompt("URL del servidor [http://localhost:3000]: ")?;
    if base_url.is_empty() {
        base_url = "http://localhost:3000".to_string();
    }
    let token = prompt("Token JWT: ")?;

    let session = Session {
        client: Client::new(),
        base_url: base_url.trim_end_matches('/').to_string(),
        token,
    };

    let health: Value = session
        .client
        .get(format!("{}/health", session.base_url))
        .send()
        .await
        .context("No se pudo conectar al servidor")?
        .json()
        .await?;

    println!(
        "{} servidor {} | almacén {} | política {}",
        "✅".bright_green(),
        health["status"].as_str().unwrap_or("?"),
        health["store"].as_str().unwrap_or("?"),
        health["transition_policy"].as_str().unwrap_or("?")
    );

    Ok(session)
}

async fn call(session: &Session, method: Method, path: &str, body: Option<Value>) -> Result<Value> {
    let url = format!("{}/api/orders{}", session.base_url, path);
    println!("{} {} {}", "📤".bright_blue(), method, url);

    let mut request = session.client.request(method, &url).bearer_auth(&session.token);
    if let Some(body) = body {
        request = request.json(&body);
    }

    let response = request.send().await?;
    let status = response.status();
    let value: Value = response.json().await.unwrap_or(Value::Null);

    if !status.is_success() {
        bail!(
            "{} {}: {}",
            status.as_u16(),
            value["code"].as_str().unwrap_or("ERROR"),
            value["message"].as_str().unwrap_or("sin mensaje")
        );
    }

    Ok(value)
}

async fn show_board(session: &Session) -> Result<()> {
    let board = call(session, Method::GET, "/board", None).await?;

    for column in board["columns"].as_array().into_iter().flatten() {
        let orders = column["orders"].as_array().cloned().unwrap_or_default();
        println!();
        println!(
            "{} ({})",
            column["status"].as_str().unwrap_or("?").bright_cyan().bold(),
            orders.len()
        );
        for order in orders {
            println!(
                "   #{} {} | {} | {} | v{} | {}",
                order["code"],
                order["vehicle"]["plate"].as_str().unwrap_or("?"),
                order["customer"]["name"].as_str().unwrap_or("?"),
                order["total"],
                order["version"],
                order["id"].as_str().unwrap_or("?").dimmed()
            );
        }
    }

    Ok(())
}

async fn create_demo_order(session: &Session) -> Result<()> {
    let payload = json!({
        "customer": { "name": "Cliente Teste", "phone": "(11) 91234-5678" },
        "vehicle": { "plate": "TST1A23", "model": "Gol", "color": "Prata" },
        "items": [
            { "service_name": "Lavagem simples", "price": 35.0 },
            { "service_name": "Cera", "price": 20.0 }
        ]
    });

    let response = call(session, Method::POST, "", Some(payload)).await?;
    let order = &response["data"];
    println!(
        "{} Orden #{} creada ({}), total {}",
        "✅".bright_green(),
        order["code"],
        order["id"].as_str().unwrap_or("?"),
        order["total"]
    );
    Ok(())
}

async fn move_order(session: &Session) -> Result<()> {
    let id = prompt("ID de la orden: ")?;
    let status = prompt(&format!("Nuevo estado {:?}: ", STATUSES))?.to_uppercase();
    let version = prompt("Versión esperada (enter para omitir): ")?;

    let mut body = json!({ "status": status });
    if !version.is_empty() {
        body["version"] = json!(version.parse::<i32>().context("Versión inválida")?);
    }

    let order = call(session, Method::PATCH, &format!("/{}/status", id), Some(body)).await?;
    println!(
        "{} Orden #{} ahora en {} (v{})",
        "✅".bright_green(),
        order["code"],
        order["status"].as_str().unwrap_or("?").bright_cyan(),
        order["version"]
    );
    Ok(())
}

async fn show_history(session: &Session) -> Result<()> {
    let id = prompt("ID de la orden: ")?;
    let response = call(session, Method::GET, &format!("/{}/history", id), None).await?;

    let events = response["data"]["events"].as_array().cloned().unwrap_or_default();
    if events.is_empty() {
        println!("{}", "ℹ️ Sin transiciones registradas".bright_yellow());
    }
    for event in events {
        println!(
            "   {} {} → {}",
            event["changed_at"].as_str().unwrap_or("?").dimmed(),
            event["from_status"].as_str().unwrap_or("?"),
            event["to_status"].as_str().unwrap_or("?").bright_green()
        );
    }
    Ok(())
}
