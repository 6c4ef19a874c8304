use chrono::NaiveDate;
use std::sync::Arc;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};

use engine::{
    Account, BudgetAlert, Category, CorrectionTarget, CreateBudgetCmd, CreateTransactionCmd,
    Currency, DeleteTransactionCmd, Engine, EngineError, TransactionListFilter, TransactionType,
    UpdateBudgetCmd, UpdateTransactionCmd,
};
use migration::MigratorTrait;
use uuid::Uuid;

const ALICE: &str = "alice";
const BOB: &str = "bob";

struct Fixture {
    engine: Engine,
    db: DatabaseConnection,
    account: Account,
    food: Category,
    salary: Category,
}

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

async fn fixture() -> Fixture {
    let (engine, db) = engine_with_db().await;
    let account = engine
        .create_account(ALICE, "Wallet", 1000_00, Currency::Thb)
        .await
        .unwrap();
    let food = engine
        .create_category(ALICE, "Food", TransactionType::Expense)
        .await
        .unwrap();
    let salary = engine
        .create_category(ALICE, "Salary", TransactionType::Income)
        .await
        .unwrap();
    Fixture {
        engine,
        db,
        account,
        food,
        salary,
    }
}

fn day(m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, m, d).unwrap()
}

async fn balance(engine: &Engine, account_id: Uuid) -> i64 {
    engine.account(ALICE, account_id).await.unwrap().balance_minor
}

async fn spent(engine: &Engine, budget_id: Uuid) -> i64 {
    engine
        .budget_status(ALICE, budget_id)
        .await
        .unwrap()
        .budget
        .spent_minor
}

/// Recomputing from the transactions finds nothing to fix.
async fn assert_consistent(engine: &Engine) {
    let corrections = engine.recompute_ledger(ALICE).await.unwrap();
    assert!(corrections.is_empty(), "ledger drifted: {corrections:?}");
}

async fn january_budget(engine: &Engine, amount_minor: i64, category_id: Option<Uuid>) -> Uuid {
    let mut cmd = CreateBudgetCmd::new(ALICE, amount_minor, day(1, 1), day(1, 31));
    if let Some(category_id) = category_id {
        cmd = cmd.category_id(category_id);
    }
    engine.create_budget(cmd).await.unwrap().id
}

#[tokio::test]
async fn create_update_delete_keep_balance_and_spent_in_step() {
    let f = fixture().await;
    let budget_id = january_budget(&f.engine, 500_00, Some(f.food.id)).await;

    let created = f
        .engine
        .create_transaction(CreateTransactionCmd::new(
            ALICE,
            f.account.id,
            f.food.id,
            200_00,
            day(1, 15),
        ))
        .await
        .unwrap();
    assert_eq!(created.transaction.kind, TransactionType::Expense);
    assert_eq!(created.account.balance_minor, 800_00);
    assert_eq!(balance(&f.engine, f.account.id).await, 800_00);
    assert_eq!(spent(&f.engine, budget_id).await, 200_00);

    let tx_id = created.transaction.id;
    f.engine
        .update_transaction(UpdateTransactionCmd::new(ALICE, tx_id).amount_minor(300_00))
        .await
        .unwrap();
    assert_eq!(balance(&f.engine, f.account.id).await, 700_00);
    assert_eq!(spent(&f.engine, budget_id).await, 300_00);

    let outcome = f
        .engine
        .delete_transaction(DeleteTransactionCmd::new(ALICE, tx_id))
        .await
        .unwrap();
    assert_eq!(outcome.message, "Transaction deleted successfully");
    assert_eq!(balance(&f.engine, f.account.id).await, 1000_00);
    assert_eq!(spent(&f.engine, budget_id).await, 0);

    let err = f.engine.transaction(ALICE, tx_id).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
    assert_consistent(&f.engine).await;
}

#[tokio::test]
async fn moving_category_shifts_spent_between_budgets() {
    let f = fixture().await;
    let travel = f
        .engine
        .create_category(ALICE, "Travel", TransactionType::Expense)
        .await
        .unwrap();
    let rent = f
        .engine
        .create_category(ALICE, "Rent", TransactionType::Expense)
        .await
        .unwrap();
    let food_budget = january_budget(&f.engine, 500_00, Some(f.food.id)).await;
    let travel_budget = january_budget(&f.engine, 500_00, Some(travel.id)).await;
    let rent_budget = january_budget(&f.engine, 500_00, Some(rent.id)).await;
    let global_budget = january_budget(&f.engine, 2000_00, None).await;

    let tx = f
        .engine
        .create_transaction(CreateTransactionCmd::new(
            ALICE,
            f.account.id,
            f.food.id,
            150_00,
            day(1, 10),
        ))
        .await
        .unwrap();
    assert_eq!(spent(&f.engine, food_budget).await, 150_00);
    assert_eq!(spent(&f.engine, global_budget).await, 150_00);

    f.engine
        .update_transaction(
            UpdateTransactionCmd::new(ALICE, tx.transaction.id)
                .category_id(travel.id)
                .amount_minor(175_00),
        )
        .await
        .unwrap();

    assert_eq!(spent(&f.engine, food_budget).await, 0);
    assert_eq!(spent(&f.engine, travel_budget).await, 175_00);
    assert_eq!(spent(&f.engine, rent_budget).await, 0);
    assert_eq!(spent(&f.engine, global_budget).await, 175_00);
    assert_eq!(balance(&f.engine, f.account.id).await, 825_00);
    assert_consistent(&f.engine).await;
}

#[tokio::test]
async fn moving_date_out_of_window_releases_budget() {
    let f = fixture().await;
    let budget_id = january_budget(&f.engine, 500_00, None).await;
    let tx = f
        .engine
        .create_transaction(CreateTransactionCmd::new(
            ALICE,
            f.account.id,
            f.food.id,
            50_00,
            day(1, 31),
        ))
        .await
        .unwrap();
    assert_eq!(spent(&f.engine, budget_id).await, 50_00);

    f.engine
        .update_transaction(UpdateTransactionCmd::new(ALICE, tx.transaction.id).date(day(2, 1)))
        .await
        .unwrap();
    assert_eq!(spent(&f.engine, budget_id).await, 0);
    assert_eq!(balance(&f.engine, f.account.id).await, 950_00);
    assert_consistent(&f.engine).await;
}

#[tokio::test]
async fn moving_account_restores_old_and_debits_new() {
    let f = fixture().await;
    let card = f
        .engine
        .create_account(ALICE, "Card", 0, Currency::Usd)
        .await
        .unwrap();
    let tx = f
        .engine
        .create_transaction(CreateTransactionCmd::new(
            ALICE,
            f.account.id,
            f.food.id,
            40_00,
            day(1, 5),
        ))
        .await
        .unwrap();

    let updated = f
        .engine
        .update_transaction(UpdateTransactionCmd::new(ALICE, tx.transaction.id).account_id(card.id))
        .await
        .unwrap();
    assert_eq!(updated.account.id, card.id);
    assert_eq!(balance(&f.engine, f.account.id).await, 1000_00);
    assert_eq!(balance(&f.engine, card.id).await, -40_00);
    assert_consistent(&f.engine).await;
}

#[tokio::test]
async fn empty_update_changes_nothing() {
    let f = fixture().await;
    let budget_id = january_budget(&f.engine, 500_00, Some(f.food.id)).await;
    let tx = f
        .engine
        .create_transaction(
            CreateTransactionCmd::new(ALICE, f.account.id, f.food.id, 120_00, day(1, 20))
                .description("groceries"),
        )
        .await
        .unwrap();

    let updated = f
        .engine
        .update_transaction(UpdateTransactionCmd::new(ALICE, tx.transaction.id))
        .await
        .unwrap();
    assert_eq!(updated.transaction, tx.transaction);
    assert_eq!(balance(&f.engine, f.account.id).await, 880_00);
    assert_eq!(spent(&f.engine, budget_id).await, 120_00);
    assert_consistent(&f.engine).await;
}

#[tokio::test]
async fn income_moves_balance_but_never_spent() {
    let f = fixture().await;
    let budget_id = january_budget(&f.engine, 500_00, None).await;

    let tx = f
        .engine
        .create_transaction(CreateTransactionCmd::new(
            ALICE,
            f.account.id,
            f.salary.id,
            300_00,
            day(1, 1),
        ))
        .await
        .unwrap();
    assert_eq!(tx.transaction.kind, TransactionType::Income);
    assert_eq!(balance(&f.engine, f.account.id).await, 1300_00);
    assert_eq!(spent(&f.engine, budget_id).await, 0);

    // Flipping the type turns it into spending.
    f.engine
        .update_transaction(
            UpdateTransactionCmd::new(ALICE, tx.transaction.id).kind(TransactionType::Expense),
        )
        .await
        .unwrap();
    assert_eq!(balance(&f.engine, f.account.id).await, 700_00);
    assert_eq!(spent(&f.engine, budget_id).await, 300_00);
    assert_consistent(&f.engine).await;
}

#[tokio::test]
async fn type_is_inherited_on_create_and_kept_on_category_change() {
    let f = fixture().await;

    let explicit = f
        .engine
        .create_transaction(
            CreateTransactionCmd::new(ALICE, f.account.id, f.salary.id, 10_00, day(1, 2))
                .kind(TransactionType::Expense),
        )
        .await
        .unwrap();
    assert_eq!(explicit.transaction.kind, TransactionType::Expense);

    let inherited = f
        .engine
        .create_transaction(CreateTransactionCmd::new(
            ALICE,
            f.account.id,
            f.salary.id,
            10_00,
            day(1, 2),
        ))
        .await
        .unwrap();
    assert_eq!(inherited.transaction.kind, TransactionType::Income);

    let moved = f
        .engine
        .update_transaction(
            UpdateTransactionCmd::new(ALICE, inherited.transaction.id).category_id(f.food.id),
        )
        .await
        .unwrap();
    assert_eq!(moved.transaction.kind, TransactionType::Income);
    assert_eq!(moved.category.id, f.food.id);
    assert_consistent(&f.engine).await;
}

#[tokio::test]
async fn tags_are_replaced_only_when_given() {
    let f = fixture().await;
    let work = f.engine.create_tag(ALICE, "work").await.unwrap();
    let trip = f.engine.create_tag(ALICE, "trip").await.unwrap();

    let tx = f
        .engine
        .create_transaction(
            CreateTransactionCmd::new(ALICE, f.account.id, f.food.id, 5_00, day(1, 3))
                .tag_ids(vec![work.id, work.id]),
        )
        .await
        .unwrap();
    assert_eq!(tx.tags, vec![work.clone()]);

    let kept = f
        .engine
        .update_transaction(UpdateTransactionCmd::new(ALICE, tx.transaction.id).amount_minor(6_00))
        .await
        .unwrap();
    assert_eq!(kept.tags, vec![work.clone()]);

    let replaced = f
        .engine
        .update_transaction(
            UpdateTransactionCmd::new(ALICE, tx.transaction.id).tag_ids(vec![trip.id]),
        )
        .await
        .unwrap();
    assert_eq!(replaced.tags, vec![trip]);

    let cleared = f
        .engine
        .update_transaction(UpdateTransactionCmd::new(ALICE, tx.transaction.id).tag_ids(vec![]))
        .await
        .unwrap();
    assert!(cleared.tags.is_empty());
}

#[tokio::test]
async fn description_patch_keeps_replaces_and_clears() {
    let f = fixture().await;
    let tx = f
        .engine
        .create_transaction(
            CreateTransactionCmd::new(ALICE, f.account.id, f.food.id, 5_00, day(1, 3))
                .description("  lunch "),
        )
        .await
        .unwrap();
    assert_eq!(tx.transaction.description.as_deref(), Some("lunch"));

    let id = tx.transaction.id;
    let kept = f
        .engine
        .update_transaction(UpdateTransactionCmd::new(ALICE, id).amount_minor(7_00))
        .await
        .unwrap();
    assert_eq!(kept.transaction.description.as_deref(), Some("lunch"));

    let cleared = f
        .engine
        .update_transaction(UpdateTransactionCmd::new(ALICE, id).description(""))
        .await
        .unwrap();
    assert_eq!(cleared.transaction.description, None);
}

#[tokio::test]
async fn failed_create_leaves_no_trace() {
    let f = fixture().await;
    let budget_id = january_budget(&f.engine, 500_00, None).await;

    let err = f
        .engine
        .create_transaction(
            CreateTransactionCmd::new(ALICE, f.account.id, f.food.id, 200_00, day(1, 15))
                .tag_ids(vec![Uuid::new_v4()]),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));

    assert_eq!(balance(&f.engine, f.account.id).await, 1000_00);
    assert_eq!(spent(&f.engine, budget_id).await, 0);
    let listed = f
        .engine
        .list_transactions(ALICE, &TransactionListFilter::default())
        .await
        .unwrap();
    assert!(listed.is_empty());
}

#[tokio::test]
async fn failed_update_leaves_ledger_untouched() {
    let f = fixture().await;
    let budget_id = january_budget(&f.engine, 500_00, None).await;
    let tx = f
        .engine
        .create_transaction(CreateTransactionCmd::new(
            ALICE,
            f.account.id,
            f.food.id,
            200_00,
            day(1, 15),
        ))
        .await
        .unwrap();

    let err = f
        .engine
        .update_transaction(
            UpdateTransactionCmd::new(ALICE, tx.transaction.id)
                .amount_minor(999_00)
                .tag_ids(vec![Uuid::new_v4()]),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));

    let err = f
        .engine
        .update_transaction(
            UpdateTransactionCmd::new(ALICE, tx.transaction.id).account_id(Uuid::new_v4()),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));

    let stored = f.engine.transaction(ALICE, tx.transaction.id).await.unwrap();
    assert_eq!(stored.transaction, tx.transaction);
    assert_eq!(balance(&f.engine, f.account.id).await, 800_00);
    assert_eq!(spent(&f.engine, budget_id).await, 200_00);
}

#[tokio::test]
async fn invalid_amounts_are_rejected() {
    let f = fixture().await;
    let err = f
        .engine
        .create_transaction(CreateTransactionCmd::new(
            ALICE,
            f.account.id,
            f.food.id,
            0,
            day(1, 1),
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    let err = f
        .engine
        .create_transaction(CreateTransactionCmd::new(
            ALICE,
            Uuid::nil(),
            f.food.id,
            10_00,
            day(1, 1),
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    let tx = f
        .engine
        .create_transaction(CreateTransactionCmd::new(
            ALICE,
            f.account.id,
            f.food.id,
            10_00,
            day(1, 1),
        ))
        .await
        .unwrap();
    let err = f
        .engine
        .update_transaction(UpdateTransactionCmd::new(ALICE, tx.transaction.id).amount_minor(-5))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
    assert_eq!(balance(&f.engine, f.account.id).await, 990_00);
}

#[tokio::test]
async fn other_users_rows_are_forbidden() {
    let f = fixture().await;
    let tx = f
        .engine
        .create_transaction(CreateTransactionCmd::new(
            ALICE,
            f.account.id,
            f.food.id,
            100_00,
            day(1, 1),
        ))
        .await
        .unwrap();

    let err = f
        .engine
        .update_transaction(UpdateTransactionCmd::new(BOB, tx.transaction.id).amount_minor(1_00))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    let err = f
        .engine
        .delete_transaction(DeleteTransactionCmd::new(BOB, tx.transaction.id))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    let bob_food = f
        .engine
        .create_category(BOB, "Food", TransactionType::Expense)
        .await
        .unwrap();
    let err = f
        .engine
        .create_transaction(CreateTransactionCmd::new(
            BOB,
            f.account.id,
            bob_food.id,
            1_00,
            day(1, 1),
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    assert_eq!(balance(&f.engine, f.account.id).await, 900_00);
    assert!(
        f.engine
            .list_transactions(BOB, &TransactionListFilter::default())
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn recompute_repairs_corrupted_totals() {
    let f = fixture().await;
    let budget_id = january_budget(&f.engine, 500_00, None).await;
    f.engine
        .create_transaction(CreateTransactionCmd::new(
            ALICE,
            f.account.id,
            f.food.id,
            80_00,
            day(1, 9),
        ))
        .await
        .unwrap();

    f.db
        .execute_unprepared("UPDATE accounts SET balance_minor = 1")
        .await
        .unwrap();
    f.db
        .execute_unprepared("UPDATE budgets SET spent_minor = 2")
        .await
        .unwrap();

    let mut corrections = f.engine.recompute_ledger(ALICE).await.unwrap();
    corrections.sort_by_key(|c| matches!(c.target, CorrectionTarget::Budget(_)));
    assert_eq!(corrections.len(), 2);
    assert_eq!(corrections[0].target, CorrectionTarget::Account(f.account.id));
    assert_eq!(corrections[0].stored_minor, 1);
    assert_eq!(corrections[0].computed_minor, 920_00);
    assert_eq!(corrections[1].target, CorrectionTarget::Budget(budget_id));
    assert_eq!(corrections[1].computed_minor, 80_00);

    assert_eq!(balance(&f.engine, f.account.id).await, 920_00);
    assert_eq!(spent(&f.engine, budget_id).await, 80_00);
    assert_consistent(&f.engine).await;
}

#[tokio::test]
async fn budget_spent_starts_from_existing_expenses_and_follows_edits() {
    let f = fixture().await;
    for (amount, date) in [(100_00, day(1, 5)), (50_00, day(2, 5))] {
        f.engine
            .create_transaction(CreateTransactionCmd::new(
                ALICE,
                f.account.id,
                f.food.id,
                amount,
                date,
            ))
            .await
            .unwrap();
    }
    f.engine
        .create_transaction(CreateTransactionCmd::new(
            ALICE,
            f.account.id,
            f.salary.id,
            900_00,
            day(1, 6),
        ))
        .await
        .unwrap();

    let budget_id = january_budget(&f.engine, 120_00, Some(f.food.id)).await;
    assert_eq!(spent(&f.engine, budget_id).await, 100_00);

    let alerts = f.engine.budget_alerts(ALICE).await.unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].alert, Some(BudgetAlert::NearLimit));

    let widened = f
        .engine
        .update_budget(UpdateBudgetCmd::new(ALICE, budget_id).end_date(day(2, 29)))
        .await
        .unwrap();
    assert_eq!(widened.spent_minor, 150_00);
    let status = f.engine.budget_status(ALICE, budget_id).await.unwrap();
    assert!(status.is_over_budget);
    assert_eq!(status.remaining_minor, -30_00);

    let global = f
        .engine
        .update_budget(UpdateBudgetCmd::new(ALICE, budget_id).all_categories().amount_minor(1000_00))
        .await
        .unwrap();
    assert_eq!(global.category_id, None);
    assert_eq!(global.spent_minor, 150_00);
    assert!(f.engine.budget_alerts(ALICE).await.unwrap().is_empty());
    assert_consistent(&f.engine).await;

    let err = f
        .engine
        .create_budget(CreateBudgetCmd::new(ALICE, 10_00, day(3, 1), day(2, 1)))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    f.engine.delete_budget(ALICE, budget_id).await.unwrap();
    assert!(f.engine.list_budgets(ALICE).await.unwrap().is_empty());
}

#[tokio::test]
async fn names_are_unique_per_user_and_categories_in_use_cannot_go() {
    let f = fixture().await;

    let err = f
        .engine
        .create_category(ALICE, "food", TransactionType::Expense)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::ExistingKey(_)));
    let err = f
        .engine
        .create_account(ALICE, "wallet", 0, Currency::Thb)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::ExistingKey(_)));
    f.engine.create_tag(ALICE, "home").await.unwrap();
    let err = f.engine.create_tag(ALICE, "HOME").await.unwrap_err();
    assert!(matches!(err, EngineError::ExistingKey(_)));
    f.engine
        .create_account(BOB, "Wallet", 0, Currency::Thb)
        .await
        .unwrap();

    f.engine
        .create_transaction(CreateTransactionCmd::new(
            ALICE,
            f.account.id,
            f.food.id,
            1_00,
            day(1, 1),
        ))
        .await
        .unwrap();
    let err = f
        .engine
        .delete_category(ALICE, f.food.id)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InUse(_)));

    let renamed = f
        .engine
        .update_category(ALICE, f.salary.id, Some("Payroll"), None)
        .await
        .unwrap();
    assert_eq!(renamed.name, "Payroll");
    assert_eq!(renamed.kind, TransactionType::Income);
    f.engine.delete_category(ALICE, f.salary.id).await.unwrap();
    let names: Vec<String> = f
        .engine
        .list_categories(ALICE)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["Food".to_string()]);
}

#[tokio::test]
async fn list_filters_and_orders_newest_first() {
    let f = fixture().await;
    for (category, amount, date, description) in [
        (f.food.id, 1_00, day(1, 1), "Coffee beans"),
        (f.salary.id, 2_00, day(1, 2), "Payroll"),
        (f.food.id, 3_00, day(1, 3), "Iced COFFEE"),
        (f.food.id, 4_00, day(2, 1), "50% off lunch"),
    ] {
        f.engine
            .create_transaction(
                CreateTransactionCmd::new(ALICE, f.account.id, category, amount, date)
                    .description(description),
            )
            .await
            .unwrap();
    }

    let all = f
        .engine
        .list_transactions(ALICE, &TransactionListFilter::default())
        .await
        .unwrap();
    let amounts: Vec<i64> = all.iter().map(|d| d.transaction.amount_minor).collect();
    assert_eq!(amounts, vec![4_00, 3_00, 2_00, 1_00]);

    let january_food = f
        .engine
        .list_transactions(
            ALICE,
            &TransactionListFilter {
                category_id: Some(f.food.id),
                from: Some(day(1, 1)),
                to: Some(day(1, 31)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let amounts: Vec<i64> = january_food
        .iter()
        .map(|d| d.transaction.amount_minor)
        .collect();
    assert_eq!(amounts, vec![3_00, 1_00]);

    let income = f
        .engine
        .list_transactions(
            ALICE,
            &TransactionListFilter {
                kind: Some(TransactionType::Income),
                limit: Some(5),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(income.len(), 1);
    assert_eq!(income[0].category.name, "Salary");

    let amounts_of = |details: Vec<engine::TransactionDetail>| -> Vec<i64> {
        details.iter().map(|d| d.transaction.amount_minor).collect()
    };

    let coffee = f
        .engine
        .list_transactions(
            ALICE,
            &TransactionListFilter {
                search: Some("coffee".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(amounts_of(coffee), vec![3_00, 1_00]);

    // `%` is matched literally.
    let percent = f
        .engine
        .list_transactions(
            ALICE,
            &TransactionListFilter {
                search: Some("0%".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(amounts_of(percent), vec![4_00]);

    let blank = f
        .engine
        .list_transactions(
            ALICE,
            &TransactionListFilter {
                search: Some("  ".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(blank.len(), 4);

    let middle = f
        .engine
        .list_transactions(
            ALICE,
            &TransactionListFilter {
                min_amount_minor: Some(2_00),
                max_amount_minor: Some(3_00),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(amounts_of(middle), vec![3_00, 2_00]);

    let food_from_three = f
        .engine
        .list_transactions(
            ALICE,
            &TransactionListFilter {
                category_id: Some(f.food.id),
                min_amount_minor: Some(3_00),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(amounts_of(food_from_three), vec![4_00, 3_00]);

    let err = f
        .engine
        .list_transactions(
            ALICE,
            &TransactionListFilter {
                min_amount_minor: Some(5_00),
                max_amount_minor: Some(1_00),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

#[tokio::test]
async fn budget_over_huge_spending_is_rejected_not_overflowed() {
    let (engine, _db) = engine_with_db().await;
    let huge = 5_000_000_000_000_000_000_i64;
    let food = engine
        .create_category(ALICE, "Food", TransactionType::Expense)
        .await
        .unwrap();
    for name in ["Checking", "Savings"] {
        let account = engine
            .create_account(ALICE, name, 0, Currency::Thb)
            .await
            .unwrap();
        engine
            .create_transaction(CreateTransactionCmd::new(
                ALICE,
                account.id,
                food.id,
                huge,
                day(1, 10),
            ))
            .await
            .unwrap();
    }

    let err = engine
        .create_budget(CreateBudgetCmd::new(ALICE, 100_00, day(1, 1), day(1, 31)))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)), "{err:?}");
    assert!(engine.list_budgets(ALICE).await.unwrap().is_empty());
    assert_consistent(&engine).await;
}

async fn engine_with_file_db() -> (Engine, std::path::PathBuf) {
    let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../../target/test_dbs");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(format!("ledger_{}.db", Uuid::new_v4()));
    let url = format!("sqlite:{}?mode=rwc", path.display());
    let mut options = ConnectOptions::new(url);
    options.max_connections(8).sqlx_logging(false);
    let db = Database::connect(options).await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db).build().await.unwrap();
    (engine, path)
}

/// Concurrent writers may see the database locked; a failed write is rolled
/// back whole, so retrying it is safe.
async fn create_with_retry(engine: &Engine, cmd: CreateTransactionCmd) {
    for _ in 0..50 {
        match engine.create_transaction(cmd.clone()).await {
            Ok(_) => return,
            Err(EngineError::Database(_)) => {
                tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            }
            Err(err) => panic!("unexpected error: {err:?}"),
        }
    }
    panic!("transaction kept failing on a busy database");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creates_keep_balance_and_spent_exact() {
    let (engine, path) = engine_with_file_db().await;
    let account = engine
        .create_account(ALICE, "Wallet", 1000_00, Currency::Thb)
        .await
        .unwrap();
    let food = engine
        .create_category(ALICE, "Food", TransactionType::Expense)
        .await
        .unwrap();
    let budget_id = january_budget(&engine, 5000_00, Some(food.id)).await;

    let engine = Arc::new(engine);
    let writers = 20_i64;
    let mut handles = Vec::new();
    for i in 0..writers {
        let engine = Arc::clone(&engine);
        let cmd = CreateTransactionCmd::new(ALICE, account.id, food.id, 10_00, day(1, 15))
            .description(format!("lunch {i}"));
        handles.push(tokio::spawn(async move {
            create_with_retry(&engine, cmd).await;
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(balance(&engine, account.id).await, 1000_00 - writers * 10_00);
    assert_eq!(spent(&engine, budget_id).await, writers * 10_00);
    let listed = engine
        .list_transactions(ALICE, &TransactionListFilter::default())
        .await
        .unwrap();
    assert_eq!(listed.len() as i64, writers);
    assert_consistent(&engine).await;

    drop(engine);
    let _ = std::fs::remove_file(path);
}
