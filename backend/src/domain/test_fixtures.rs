//! Shared fixtures for domain unit tests.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

use super::{Amount, Beer, BeerId, Hop, Ingredients, Malt};

/// A beer with every descriptive attribute populated, so business equality
/// can hold between copies of it.
pub(crate) fn complete_beer(id: u64, name: &str) -> Beer {
    let mut beer = Beer::named(BeerId::new(id), name);
    beer.first_brewed = Some("09/2007".to_owned());
    beer.description = Some("A light, crisp and bitter IPA.".to_owned());
    beer.brewers_tips = Some("Use fresh hops.".to_owned());
    beer.abv = Some(4.5);
    beer.ibu = Some(60.0);
    beer.ph = Some(4.4);
    beer.volume = Some(Amount::new(20.0, "litres"));
    beer.boil_volume = Some(Amount::new(25.0, "litres"));
    beer.ingredients = Some(Ingredients {
        malt: Some(vec![Malt {
            name: Some("Maris Otter Extra Pale".to_owned()),
            amount: Some(Amount::new(3.3, "kilograms")),
        }]),
        hops: Some(vec![Hop {
            name: Some("Fuggles".to_owned()),
            amount: Some(Amount::new(25.0, "grams")),
            add: Some("start".to_owned()),
            attribute: Some("bitter".to_owned()),
        }]),
        yeast: Some("Wyeast 1056".to_owned()),
    });
    beer.food_pairing = Some(vec!["Spicy chicken tikka masala".to_owned()]);
    beer
}

pub(crate) fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2021, 3, 14, 9, 30, 0)
        .single()
        .expect("valid fixture timestamp")
}

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

pub(crate) fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock {
        utc_now: fixture_timestamp(),
    })
}
