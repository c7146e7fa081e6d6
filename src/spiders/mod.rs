pub mod chi_ssa_27;
pub mod cook_landbank;
pub mod il_port_district;

mod util;

pub use chi_ssa_27::ChiSsa27Spider;
pub use chi_standards_tests::ChiStandardsTestsSpider;
pub use cook_landbank::CookLandbankSpider;
pub use il_port_district::IlPortDistrictSpider;

use crate::core::Spider;
use crate::{ScraperError, ScraperResult};

/// Every spider this crate ships.
pub fn all() -> ScraperResult<Vec<Box<dyn Spider>>> {
    Ok(vec![
        Box::new(ChiSsa27Spider::new()?),
        Box::new(ChiStandardsTestsSpider::new()?),
        Box::new(CookLandbankSpider::new()?),
        Box::new(IlPortDistrictSpider::new()?),
    ])
}

pub fn by_name(name: &str) -> ScraperResult<Box<dyn Spider>> {
    all()?
        .into_iter()
        .find(|spider| spider.name() == name)
        .ok_or_else(|| ScraperError::UnknownSpider(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_unique() {
        let mut names: Vec<_> = all()
            .unwrap()
            .iter()
            .map(|spider| spider.name().to_string())
            .collect();
        names.sort();
        names.dedup();
        assert_eq!(
            names,
            vec![
                "chi_ssa_27",
                "chi_standards_tests",
                "cook_landbank",
                "il_port_district"
            ]
        );
    }

    #[test]
    fn test_by_name() {
        let spider = by_name("il_port_district").unwrap();
        assert_eq!(spider.agency(), "Illinois International Port District");
        assert_eq!(spider.start_urls().len(), 3);
    }

    #[test]
    fn test_unknown_spider() {
        assert!(matches!(
            by_name("chi_nowhere"),
            Err(ScraperError::UnknownSpider(name)) if name == "chi_nowhere"
        ));
    }
}
