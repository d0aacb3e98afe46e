use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;

use expense_control::{
    category::{CategoryDescription, CategoryPurpose, ValidatedCategory, create_category},
    initialize_db,
    person::{Age, PersonName, ValidatedPerson, create_person},
    transaction::{TransactionForm, TransactionType, create_transaction},
};

/// A utility for creating a test database for the REST API server of expense_control.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating test persons...");
    let mut persons = Vec::new();
    for (name, age) in [("Carlos Souza", 45), ("Fernanda Souza", 43), ("Pedro Souza", 15)] {
        persons.push(create_person(
            ValidatedPerson {
                name: PersonName::new(name)?,
                age: Age::new(age)?,
            },
            &conn,
        )?);
    }

    println!("Creating test categories...");
    let mut categories = Vec::new();
    for (description, purpose) in [
        ("Salário", CategoryPurpose::Income),
        ("Mercado", CategoryPurpose::Expense),
        ("Transporte", CategoryPurpose::Expense),
        ("Freelance", CategoryPurpose::Both),
    ] {
        categories.push(create_category(
            ValidatedCategory {
                description: CategoryDescription::new(description)?,
                purpose,
            },
            &conn,
        )?);
    }

    println!("Creating test transactions...");
    let transactions = [
        ("Salário de janeiro", 6500.0, TransactionType::Income, 0, 0),
        ("Salário de janeiro", 5200.0, TransactionType::Income, 1, 0),
        ("Compras da semana", 432.87, TransactionType::Expense, 1, 1),
        ("Gasolina", 250.0, TransactionType::Expense, 0, 2),
        ("Passe escolar", 89.9, TransactionType::Expense, 2, 2),
        ("Site para cliente", 1800.0, TransactionType::Income, 0, 3),
        ("Lanche", 18.5, TransactionType::Expense, 2, 1),
    ];

    for (description, value, transaction_type, person_index, category_index) in transactions {
        create_transaction(
            &TransactionForm {
                description: description.to_owned(),
                value,
                transaction_type,
                person_id: persons[person_index].id,
                category_id: categories[category_index].id,
            },
            &conn,
        )?;
    }

    println!("Success!");

    Ok(())
}
