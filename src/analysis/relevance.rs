//! Relevance: an entity's user count relative to its same-location peers.

use super::bands::{description_key, RelevanceBand};
use super::peers::PeerInputs;
use super::{EvalContext, Evaluation};
use crate::models::{DimensionId, ProcessEntity, SummaryItem};
use serde_json::json;
use std::collections::BTreeMap;

const USERS_TEXT_KEY: &str = "business_process_summary__relevance_numberOfUsersText";

pub fn evaluate(entity: &ProcessEntity, inputs: &PeerInputs, ctx: &EvalContext<'_>) -> Evaluation {
    let Some(avg) = inputs.avg_number_of_users else {
        return Evaluation::Declined("no peers to compare with");
    };

    let users = f64::from(inputs.number_of_users_linked);
    if users == 0.0 && avg == 0.0 {
        return Evaluation::Declined("no users");
    }

    let band = RelevanceBand::classify(users, avg);
    // At twice the peer average or more the score saturates at 1.
    let score = (users / avg).min(2.0) / 2.0;

    let (entity_name, entity_name_plural) = ctx.entity_names(entity.entity_type);
    let text_params = BTreeMap::from([
        ("numberOfUsersLinked".to_string(), json!(inputs.number_of_users_linked)),
        ("avgNumberOfUsers".to_string(), json!(avg.round() as u64)),
        ("entityName".to_string(), json!(entity_name)),
    ]);
    let number_of_users_text = ctx.resolver.resolve(USERS_TEXT_KEY, &text_params);

    let item = SummaryItem::new(
        DimensionId::Relevance,
        score,
        band.score_key(),
        description_key("relevance", band.suffix()),
    )
    .with_param("numberOfUsersText", number_of_users_text)
    .with_param("entityName", entity_name)
    .with_param("entityNamePlural", entity_name_plural);

    Evaluation::Produced(item)
}
