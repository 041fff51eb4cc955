use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, Set, TransactionTrait,
};

use crate::database::entities::uid_counters;

/// Atomically bump the counter for `label` and return the new value
///
/// Runs in its own transaction, or a savepoint when `conn` already is one.
/// The first call for a label starts at 1.
pub async fn next_counter<C>(conn: &C, label: &str) -> Result<i64, DbErr>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = conn.begin().await?;

    uid_counters::Entity::insert(uid_counters::ActiveModel {
        label: Set(label.to_string()),
        counter: Set(0),
    })
    .on_conflict(
        OnConflict::column(uid_counters::Column::Label)
            .do_nothing()
            .to_owned(),
    )
    .exec_without_returning(&txn)
    .await?;

    uid_counters::Entity::update_many()
        .col_expr(
            uid_counters::Column::Counter,
            Expr::col(uid_counters::Column::Counter).add(1),
        )
        .filter(uid_counters::Column::Label.eq(label))
        .exec(&txn)
        .await?;

    let counter = uid_counters::Entity::find_by_id(label.to_string())
        .one(&txn)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("uid counter {}", label)))?
        .counter;

    txn.commit().await?;
    Ok(counter)
}

pub fn format_uid(label: &str, counter: i64) -> String {
    format!("{}_{:06}", label, counter)
}

pub async fn next_uid<C>(conn: &C, label: &str) -> Result<String, DbErr>
where
    C: ConnectionTrait + TransactionTrait,
{
    let counter = next_counter(conn, label).await?;
    Ok(format_uid(label, counter))
}
