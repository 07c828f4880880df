//! Business-key equality for catalogue beers and users.
//!
//! Storage identifiers never take part in these comparisons. A field that is
//! absent on either side makes the records unequal, so partially populated
//! payloads are rejected as duplicates of nothing rather than crashing the
//! caller.

use super::{Amount, Beer, Hop, Ingredients, Malt, User};

/// Equality policy for beers.
///
/// # Examples
/// ```
/// use beerorder::domain::{Beer, BeerEquality, BeerId};
///
/// // Unpopulated attributes never compare equal.
/// let a = Beer::named(BeerId::new(1), "Buzz");
/// let mut b = a.clone();
/// b.id = BeerId::new(2);
/// assert!(!BeerEquality::IgnoringId.matches(&a, &b));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeerEquality {
    /// Every attribute except `id` and the `likedBy` mirror must match.
    IgnoringId,
    /// As [`BeerEquality::IgnoringId`], and both names must be present and
    /// equal.
    IgnoringIdWithName,
}

impl BeerEquality {
    /// Apply the policy to a pair of beers.
    pub fn matches(self, a: &Beer, b: &Beer) -> bool {
        match self {
            Self::IgnoringId => same_beer_attributes(a, b),
            Self::IgnoringIdWithName => both(&a.name, &b.name) && same_beer_attributes(a, b),
        }
    }
}

/// Whether `a` and `b` describe the same beer regardless of id.
pub fn is_same_beer(a: &Beer, b: &Beer) -> bool {
    BeerEquality::IgnoringId.matches(a, b)
}

/// Whether `a` and `b` describe the same beer and carry the same name.
pub fn is_same_named_beer(a: &Beer, b: &Beer) -> bool {
    BeerEquality::IgnoringIdWithName.matches(a, b)
}

/// Whether two users share the `userName` business key.
pub fn is_same_user(a: &User, b: &User) -> bool {
    a.user_name == b.user_name
}

fn same_beer_attributes(a: &Beer, b: &Beer) -> bool {
    both(&a.name, &b.name)
        && both(&a.first_brewed, &b.first_brewed)
        && both(&a.description, &b.description)
        && both(&a.brewers_tips, &b.brewers_tips)
        && both(&a.abv, &b.abv)
        && both(&a.ibu, &b.ibu)
        && both(&a.ph, &b.ph)
        && both_with(&a.volume, &b.volume, same_amount)
        && both_with(&a.boil_volume, &b.boil_volume, same_amount)
        && both_with(&a.ingredients, &b.ingredients, same_ingredients)
        && both(&a.food_pairing, &b.food_pairing)
}

fn same_ingredients(a: &Ingredients, b: &Ingredients) -> bool {
    both_with(&a.malt, &b.malt, |x, y| all_pairs(x, y, same_malt))
        && both_with(&a.hops, &b.hops, |x, y| all_pairs(x, y, same_hop))
        && both(&a.yeast, &b.yeast)
}

fn same_malt(a: &Malt, b: &Malt) -> bool {
    both(&a.name, &b.name) && both_with(&a.amount, &b.amount, same_amount)
}

fn same_hop(a: &Hop, b: &Hop) -> bool {
    both(&a.name, &b.name)
        && both_with(&a.amount, &b.amount, same_amount)
        && both(&a.add, &b.add)
        && both(&a.attribute, &b.attribute)
}

fn same_amount(a: &Amount, b: &Amount) -> bool {
    both(&a.value, &b.value) && both(&a.unit, &b.unit)
}

fn all_pairs<T>(a: &[T], b: &[T], same: impl Fn(&T, &T) -> bool) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| same(x, y))
}

fn both<T: PartialEq>(a: &Option<T>, b: &Option<T>) -> bool {
    both_with(a, b, |x, y| x == y)
}

fn both_with<T>(a: &Option<T>, b: &Option<T>, same: impl Fn(&T, &T) -> bool) -> bool {
    match (a, b) {
        (Some(x), Some(y)) => same(x, y),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_fixtures::complete_beer;
    use crate::domain::{BeerId, UserId, UserName};
    use rstest::{fixture, rstest};

    #[fixture]
    fn buzz() -> Beer {
        complete_beer(1, "Buzz")
    }

    fn with_other_id(beer: &Beer) -> Beer {
        let mut copy = beer.clone();
        copy.id = BeerId::new(beer.id.get() + 100);
        copy
    }

    #[rstest]
    fn differing_only_in_id_is_same_beer_both_ways(buzz: Beer) {
        let twin = with_other_id(&buzz);
        assert!(is_same_beer(&buzz, &twin));
        assert!(is_same_beer(&twin, &buzz));
        assert!(is_same_named_beer(&buzz, &twin));
    }

    #[rstest]
    fn liked_by_does_not_affect_identity(buzz: Beer) {
        let mut twin = with_other_id(&buzz);
        twin.insert_liker(UserId::new("u-1").expect("valid id"));
        assert!(is_same_beer(&buzz, &twin));
    }

    #[rstest]
    #[case::name(|b: &mut Beer| b.name = Some("Fizz".to_owned()))]
    #[case::first_brewed(|b: &mut Beer| b.first_brewed = Some("10/2010".to_owned()))]
    #[case::description(|b: &mut Beer| b.description = Some("Dark".to_owned()))]
    #[case::brewers_tips(|b: &mut Beer| b.brewers_tips = Some("Stir".to_owned()))]
    #[case::abv(|b: &mut Beer| b.abv = Some(4.6))]
    #[case::ibu(|b: &mut Beer| b.ibu = Some(61.0))]
    #[case::ph(|b: &mut Beer| b.ph = Some(4.0))]
    #[case::volume_value(|b: &mut Beer| b.volume = Some(Amount::new(21.0, "litres")))]
    #[case::boil_volume_unit(|b: &mut Beer| b.boil_volume = Some(Amount::new(25.0, "gallons")))]
    #[case::yeast(|b: &mut Beer| {
        if let Some(ingredients) = b.ingredients.as_mut() {
            ingredients.yeast = Some("Lager".to_owned());
        }
    })]
    #[case::malt_amount(|b: &mut Beer| {
        if let Some(malt) = b.ingredients.as_mut().and_then(|i| i.malt.as_mut()) {
            malt[0].amount = Some(Amount::new(3.4, "kilograms"));
        }
    })]
    #[case::extra_hop(|b: &mut Beer| {
        if let Some(hops) = b.ingredients.as_mut().and_then(|i| i.hops.as_mut()) {
            hops.push(Hop::default());
        }
    })]
    #[case::food_pairing(|b: &mut Beer| b.food_pairing = Some(vec![]))]
    fn changing_any_attribute_breaks_identity(buzz: Beer, #[case] change: fn(&mut Beer)) {
        let mut other = with_other_id(&buzz);
        change(&mut other);
        assert!(!is_same_beer(&buzz, &other));
        assert!(!is_same_beer(&other, &buzz));
    }

    #[rstest]
    fn missing_field_on_either_side_is_not_equal(buzz: Beer) {
        let mut partial = with_other_id(&buzz);
        partial.ph = None;
        assert!(!is_same_beer(&buzz, &partial));
        assert!(!is_same_beer(&partial, &partial.clone()));
    }

    #[rstest]
    fn named_policy_requires_names(buzz: Beer) {
        let mut a = buzz.clone();
        a.name = None;
        let b = a.clone();
        assert!(!is_same_named_beer(&a, &b));
    }

    #[rstest]
    fn users_match_by_user_name() {
        let name = UserName::new("hoppy_ada").expect("name");
        let a = User::new(UserId::random(), name.clone());
        let b = User::new(UserId::random(), name).with_age(40);
        let c = User::new(UserId::random(), UserName::new("other").expect("name"));
        assert!(is_same_user(&a, &b));
        assert!(!is_same_user(&a, &c));
    }
}
