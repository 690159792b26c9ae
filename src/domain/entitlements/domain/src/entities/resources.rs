// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use serde::{Deserialize, Serialize};

use crate::Tier;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum ResourceCategory {
    Workflows,
    MonthlyExecutions,
    KnowledgeBases,
    CollaboratorSeats,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Fixed per tier, componentwise non-decreasing with tier rank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceLimits {
    pub workflows: u64,
    pub monthly_executions: u64,
    pub knowledge_bases: u64,
    pub collaborator_seats: u64,
}

impl ResourceLimits {
    pub const fn for_tier(tier: Tier) -> Self {
        match tier {
            Tier::None => Self::new(0, 0, 0, 0),
            Tier::Standard => Self::new(10, 1_000, 3, 1),
            Tier::Premium => Self::new(50, 10_000, 20, 5),
            Tier::Enterprise => Self::new(500, 250_000, 200, 50),
        }
    }

    const fn new(
        workflows: u64,
        monthly_executions: u64,
        knowledge_bases: u64,
        collaborator_seats: u64,
    ) -> Self {
        Self {
            workflows,
            monthly_executions,
            knowledge_bases,
            collaborator_seats,
        }
    }

    pub fn limit(&self, category: ResourceCategory) -> u64 {
        match category {
            ResourceCategory::Workflows => self.workflows,
            ResourceCategory::MonthlyExecutions => self.monthly_executions,
            ResourceCategory::KnowledgeBases => self.knowledge_bases,
            ResourceCategory::CollaboratorSeats => self.collaborator_seats,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageCounters {
    pub workflows: u64,
    pub monthly_executions: u64,
    pub knowledge_bases: u64,
    pub collaborator_seats: u64,
}

impl UsageCounters {
    pub fn usage(&self, category: ResourceCategory) -> u64 {
        match category {
            ResourceCategory::Workflows => self.workflows,
            ResourceCategory::MonthlyExecutions => self.monthly_executions,
            ResourceCategory::KnowledgeBases => self.knowledge_bases,
            ResourceCategory::CollaboratorSeats => self.collaborator_seats,
        }
    }

    pub fn usage_mut(&mut self, category: ResourceCategory) -> &mut u64 {
        match category {
            ResourceCategory::Workflows => &mut self.workflows,
            ResourceCategory::MonthlyExecutions => &mut self.monthly_executions,
            ResourceCategory::KnowledgeBases => &mut self.knowledge_bases,
            ResourceCategory::CollaboratorSeats => &mut self.collaborator_seats,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
