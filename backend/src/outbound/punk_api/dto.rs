//! DTOs for decoding Punk API beer payloads.
//!
//! The remote catalogue answers `GET /beers/{id}` with a one-element array.
//! Fields the domain does not model (`tagline`, `image_url`, `method`, ...)
//! are ignored.

use serde::Deserialize;

use crate::domain::{Amount, Beer, BeerId, Hop, Ingredients, Malt};

#[derive(Debug, Deserialize)]
pub(super) struct PunkBeerDto {
    pub(super) id: u64,
    pub(super) name: Option<String>,
    pub(super) first_brewed: Option<String>,
    pub(super) description: Option<String>,
    pub(super) brewers_tips: Option<String>,
    pub(super) abv: Option<f64>,
    pub(super) ibu: Option<f64>,
    pub(super) ph: Option<f64>,
    pub(super) volume: Option<PunkAmountDto>,
    pub(super) boil_volume: Option<PunkAmountDto>,
    pub(super) ingredients: Option<PunkIngredientsDto>,
    pub(super) food_pairing: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub(super) struct PunkAmountDto {
    pub(super) value: Option<f64>,
    pub(super) unit: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct PunkIngredientsDto {
    pub(super) malt: Option<Vec<PunkMaltDto>>,
    pub(super) hops: Option<Vec<PunkHopDto>>,
    pub(super) yeast: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct PunkMaltDto {
    pub(super) name: Option<String>,
    pub(super) amount: Option<PunkAmountDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct PunkHopDto {
    pub(super) name: Option<String>,
    pub(super) amount: Option<PunkAmountDto>,
    pub(super) add: Option<String>,
    pub(super) attribute: Option<String>,
}

impl PunkBeerDto {
    pub(super) fn into_domain_beer(self) -> Beer {
        let mut beer = Beer::new(BeerId::new(self.id));
        beer.name = self.name;
        beer.first_brewed = self.first_brewed;
        beer.description = self.description;
        beer.brewers_tips = self.brewers_tips;
        beer.abv = self.abv;
        beer.ibu = self.ibu;
        beer.ph = self.ph;
        beer.volume = self.volume.map(PunkAmountDto::into_domain);
        beer.boil_volume = self.boil_volume.map(PunkAmountDto::into_domain);
        beer.ingredients = self.ingredients.map(PunkIngredientsDto::into_domain);
        beer.food_pairing = self.food_pairing;
        beer
    }
}

impl PunkAmountDto {
    fn into_domain(self) -> Amount {
        Amount {
            value: self.value,
            unit: self.unit,
        }
    }
}

impl PunkIngredientsDto {
    fn into_domain(self) -> Ingredients {
        Ingredients {
            malt: self.malt.map(|malts| {
                malts
                    .into_iter()
                    .map(|malt| Malt {
                        name: malt.name,
                        amount: malt.amount.map(PunkAmountDto::into_domain),
                    })
                    .collect()
            }),
            hops: self.hops.map(|hops| {
                hops.into_iter()
                    .map(|hop| Hop {
                        name: hop.name,
                        amount: hop.amount.map(PunkAmountDto::into_domain),
                        add: hop.add,
                        attribute: hop.attribute,
                    })
                    .collect()
            }),
            yeast: self.yeast,
        }
    }
}
