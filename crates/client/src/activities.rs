use api_types::{
    Listing,
    activity::{LeaderboardRow, UserActivity},
};
use engine::ActivityRecord;
use reqwest::Method;

use crate::{Client, error::Result};

impl Client {
    /// `GET /UserActivities/LeaderBoard`.
    pub async fn leaderboard(&self) -> Result<Vec<LeaderboardRow>> {
        let req = self.request(Method::GET, "UserActivities/LeaderBoard");
        Ok(self.send::<Listing<LeaderboardRow>>(req).await?.into_items())
    }

    /// `GET /UserActivities`.
    pub async fn activities(&self) -> Result<Vec<UserActivity>> {
        let req = self.request(Method::GET, "UserActivities");
        Ok(self.send::<Listing<UserActivity>>(req).await?.into_items())
    }

    /// All activities, flattened for aggregation.
    pub async fn activity_records(&self) -> Result<Vec<ActivityRecord>> {
        Ok(self.activities().await?.iter().map(activity_record).collect())
    }
}

/// Flattens the nested usage readings of `activity`.
pub fn activity_record(activity: &UserActivity) -> ActivityRecord {
    ActivityRecord {
        date: activity.date.clone(),
        plastic: activity.plastic_usage.and_then(|u| u.co2_emission),
        transportation: activity.traffic_usage.and_then(|u| u.co2_emission),
        energy: activity.energy_usage.and_then(|u| u.co2_emission),
        food: activity.food_usage.and_then(|u| u.co2_emission),
    }
}

#[cfg(test)]
mod tests {
    use api_types::activity::Usage;

    use super::*;

    #[test]
    fn usages_map_to_categories() {
        let activity = UserActivity {
            date: Some("2025-10-02".to_string()),
            plastic_usage: Some(Usage {
                co2_emission: Some(1.0),
            }),
            traffic_usage: Some(Usage {
                co2_emission: Some(2.0),
            }),
            energy_usage: None,
            food_usage: Some(Usage { co2_emission: None }),
            ..Default::default()
        };
        let record = activity_record(&activity);
        assert_eq!(record.plastic, Some(1.0));
        assert_eq!(record.transportation, Some(2.0));
        assert_eq!(record.energy, None);
        assert_eq!(record.food, None);
    }
}
