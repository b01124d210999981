use clap::Parser;
use serde_json::json;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Base URL of a running server
    #[arg(short, long, default_value = "http://localhost:3001")]
    base_url: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let client = reqwest::Client::new();

    let survey = json!({
        "full_name": "Ramesh Kumar",
        "phone": "9876543210",
        "q3": "street",
        "q4": "daily",
        "q5": "yes",
        "q6": ["wages", "trust"],
        "q7": ["regular-jobs", "on-time-payments"],
        "q8": "upi",
        "q9": "yes",
        "q10": "need-training",
        "q11": "maybe",
    });

    let response = client
        .post(format!("{}/api/survey", args.base_url))
        .json(&survey)
        .send()
        .await
        .unwrap();
    println!("survey: {} {}", response.status(), response.text().await.unwrap());

    let onboarding = json!({
        "full_name": "Suresh Yadav",
        "phone": "91234 56789",
        "email": "suresh@example.com",
        "address": "Pune",
        "categories": [catalog::SKILL_OPTIONS[0].value, catalog::SKILL_OPTIONS[6].value],
    });

    let response = client
        .post(format!("{}/api/workers", args.base_url))
        .json(&onboarding)
        .send()
        .await
        .unwrap();
    println!("onboarding: {} {}", response.status(), response.text().await.unwrap());

    let response = client
        .post(format!("{}/api/rating", args.base_url))
        .json(&json!({ "rating": 5 }))
        .send()
        .await
        .unwrap();
    println!("rating: {} {}", response.status(), response.text().await.unwrap());

    let response = client
        .get(format!("{}/api/rating", args.base_url))
        .send()
        .await
        .unwrap();
    println!("rating summary: {}", response.text().await.unwrap());
}
