//! Field rule tables
//!
//! One static table per certificate kind. Each rule names an output field,
//! the ordered source keys to try, a default for when none of them holds a
//! present value, and the transform applied to the winning value.

use crate::models::CertificateKind;

/// How the winning source value becomes field text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldTransform {
    /// Plain text rendering
    Text,
    /// "<ref> dated <date>" → "RB L. No. <ref>, Dt. <date>"
    ContractReference,
    /// ERC type → "<type> : <drawing code>", see [`ERC_TYPE_SOURCES`]
    DrawingNumber,
    /// Strip invisible characters and line breaks from certificate numbers
    DisplayCertificateNo,
}

/// Output field definition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    pub name: &'static str,
    pub sources: &'static [&'static str],
    pub default: &'static str,
    pub transform: FieldTransform,
}

impl FieldRule {
    const fn text(name: &'static str, sources: &'static [&'static str]) -> Self {
        Self {
            name,
            sources,
            default: "",
            transform: FieldTransform::Text,
        }
    }

    const fn with_default(mut self, default: &'static str) -> Self {
        self.default = default;
        self
    }

    const fn with_transform(mut self, transform: FieldTransform) -> Self {
        self.transform = transform;
        self
    }
}

/// Keys holding the ERC type on process calls
pub const ERC_TYPE_SOURCES: &[&str] = &["ercType", "typeOfErc", "productType", "ercTypeName"];

/// Raw drawing-number keys used when the ERC type is missing
pub const DRAWING_NO_SOURCES: &[&str] = &["drawingNo", "drgNo", "drawingNumber"];

/// Keys holding the lot array on process calls
pub const LOT_SOURCES: &[&str] = &["lots", "lotDetails", "heatLots", "lotList"];

pub const LOT_NO_SOURCES: &[&str] = &["heatNo", "lotNo", "heatNumber", "heatOrLotNo"];
pub const LOT_PROCESSED_SOURCES: &[&str] = &["totalProcessed", "processedQty", "totalQty"];
pub const LOT_ACCEPTED_SOURCES: &[&str] = &["acceptedQty", "accepted", "qtyAccepted"];
pub const LOT_REJECTED_SOURCES: &[&str] = &["rejectedQty", "rejected", "qtyRejected"];

const CONTRACTOR_SOURCES: &[&str] = &["vendorName", "contractor", "vendor_name", "firmName"];
const MANUFACTURER_SOURCES: &[&str] = &["manufacturer", "manufacturerName", "vendorName"];
const ENGINEER_SOURCES: &[&str] = &["inspectingEngineer", "ieName"];

static RAW_MATERIAL_RULES: &[FieldRule] = &[
    FieldRule::text("certificateNo", &["icNo", "certificateNo", "certificate_no"]),
    FieldRule::text("date", &["inspectionDate", "date", "certificateDate"]),
    FieldRule::text("offeredInstNo", &["offeredInstNo"]),
    FieldRule::text("passedInstNo", &["passedInstNo"]),
    FieldRule::text("contractor", CONTRACTOR_SOURCES),
    FieldRule::text("manufacturer", MANUFACTURER_SOURCES),
    FieldRule::text(
        "placeOfInspection",
        &["inspectionPlace", "placeOfInspection", "place_of_inspection"],
    ),
    FieldRule::text("contractRef", &["contractRef", "contractReference"]),
    FieldRule::text("poNoContractor", &["poNo", "poNoContractor", "po_no", "poNumber"]),
    FieldRule::text("billPayingOfficer", &["billOfficer", "billPayingOfficer"]),
    FieldRule::text("consigneeRailway", &["consignee", "consigneeRailway"]),
    FieldRule::text("purchasingAuthority", &["purchasingAuthority"]),
    FieldRule::text(
        "consigneeManufacturer",
        &["consigneeFinished", "consigneeManufacturer"],
    ),
    FieldRule::text(
        "description",
        &["productDescription", "productType", "description"],
    ),
    FieldRule::text("drgNo", &["drgNo", "drawingNo"]),
    FieldRule::text("specNo", &["specNo", "specificationNo"]),
    FieldRule::text("qapNo", &["qapNo"]),
    FieldRule::text(
        "detailsOfInspection",
        &["detailsOfInspection", "inspectionDetails"],
    ),
    FieldRule::text("chpClause", &["chpClause"]),
    FieldRule::text("contractChpReq", &["contractChpReq"]),
    FieldRule::text("result", &["result"]),
    FieldRule::text("qtyCleared", &["qtyCleared", "clearedQty"]),
    FieldRule::text("qtyRejected", &["qtyRejected"]),
    FieldRule::text("remarks", &["remarks"]),
    FieldRule::text("dateOfCall", &["dateOfCall", "callDate"]),
    FieldRule::text("noOfVisits", &["noOfVisits", "visitsNo"]),
    FieldRule::text("dateOfInspection", &["dateOfInspection", "inspectionDate"]),
    FieldRule::text("sealingPattern", &["sealingPattern"]),
    FieldRule::text("facsimile", &["facsimile", "sealFacsimile"]),
    FieldRule::text("inspectingEngineer", ENGINEER_SOURCES),
];

static PROCESS_RULES: &[FieldRule] = &[
    FieldRule::text("certificateNo", &["icNo", "certificateNo"]),
    FieldRule::text(
        "certificateDate",
        &["certificateDate", "inspectionDate", "date"],
    ),
    FieldRule::text("offeredInstNo", &["offeredInstNo"]),
    FieldRule::text("passedInstNo", &["passedInstNo"]),
    FieldRule::text("contractor", CONTRACTOR_SOURCES),
    FieldRule::text("manufacturer", MANUFACTURER_SOURCES),
    FieldRule::text(
        "contractRef",
        &["contractRef", "contractReference", "rlyContractRef"],
    )
    .with_transform(FieldTransform::ContractReference),
    FieldRule::text(
        "poDetails",
        &["poDetails", "poNo", "poNoContractor", "poNumber"],
    ),
    FieldRule::text("billPayingOfficer", &["billOfficer", "billPayingOfficer"]),
    FieldRule::text("consigneeRailway", &["consignee", "consigneeRailway"]),
    FieldRule::text(
        "consigneeManufacturer",
        &["consigneeFinished", "consigneeManufacturer"],
    ),
    FieldRule::text("purchasingAuthority", &["purchasingAuthority"]),
    FieldRule::text("description", &["description", "productDescription"]),
    FieldRule::text("drgNo", ERC_TYPE_SOURCES).with_transform(FieldTransform::DrawingNumber),
    FieldRule::text("specNo", &["specNo", "specificationNo"]),
    FieldRule::text("qapNo", &["qapNo"]),
    FieldRule::text(
        "inspectionType",
        &["inspectionType", "typeOfInspection", "inspectionDetails"],
    ),
    FieldRule::text("reference", &["reference", "rmIcReference"]),
    FieldRule::text("callDate", &["callDate", "dateOfCall"]),
    FieldRule::text("inspectionDate", &["inspectionDate", "dateOfInspection"]),
    FieldRule::text("manDays", &["manDays", "noOfManDays", "totalManDays"]),
    FieldRule::text("sealingPattern", &["sealingPattern"]),
    FieldRule::text("inspectingEngineer", ENGINEER_SOURCES),
];

static FINAL_PRODUCT_RULES: &[FieldRule] = &[
    FieldRule::text("certificateNo", &["certificateNo", "icNo"])
        .with_transform(FieldTransform::DisplayCertificateNo),
    FieldRule::text("certificateDate", &["certificateDate", "inspectionDate"]),
    FieldRule::text("offeredInstNo", &["offeredInstNo"]),
    FieldRule::text("passedInstNo", &["passedInstNo"]),
    FieldRule::text("contractor", &["contractor", "vendorName", "firmName"]),
    FieldRule::text("placeOfInspection", &["placeOfInspection", "inspectionPlace"]),
    FieldRule::text("contractRef", &["contractRef"]),
    FieldRule::text("contractRefDate", &["contractRefDate"]),
    FieldRule::text("billPayingOfficer", &["billPayingOfficer", "billOfficer"]),
    FieldRule::text("consignee", &["consignee", "consigneeRailway"]),
    FieldRule::text("purchasingAuthority", &["purchasingAuthority"]),
    FieldRule::text("itemNo", &["itemNo"]).with_default("1"),
    FieldRule::text("description", &["description", "productDescription"]),
    FieldRule::text("quantityNowPassedText", &["quantityNowPassedText"]),
    FieldRule::text("qtyOnOrder", &["qtyOnOrder"]),
    FieldRule::text("qtyOfferedPreviously", &["qtyOfferedPreviously"]),
    FieldRule::text("qtyPassedPreviously", &["qtyPassedPreviously"]),
    FieldRule::text("qtyNowOffered", &["qtyNowOffered"]),
    FieldRule::text("qtyNowPassed", &["qtyNowPassed"]),
    FieldRule::text("qtyNowRejected", &["qtyNowRejected"]),
    FieldRule::text("qtyStillDue", &["qtyStillDue"]),
    FieldRule::text("noOfItemsChecked", &["noOfItemsChecked"]),
    FieldRule::text("dateOfCall", &["dateOfCall", "callDate"]),
    FieldRule::text("noOfVisits", &["noOfVisits"]),
    FieldRule::text("datesOfInspection", &["datesOfInspection", "inspectionDate"]),
    FieldRule::text("trRecDate", &["trRecDate"]),
    FieldRule::text("sealingPattern", &["sealingPattern"]),
    FieldRule::text("facsimileText", &["facsimileText", "facsimile"]),
    FieldRule::text("reasonsForRejection", &["reasonsForRejection"])
        .with_default("Not Applicable"),
    FieldRule::text("inspectingEngineer", ENGINEER_SOURCES),
];

/// Rule table for a certificate kind
pub fn rules_for(kind: CertificateKind) -> &'static [FieldRule] {
    match kind {
        CertificateKind::RawMaterial => RAW_MATERIAL_RULES,
        CertificateKind::Process => PROCESS_RULES,
        CertificateKind::FinalProduct => FINAL_PRODUCT_RULES,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_field_names_are_unique_per_kind() {
        for kind in CertificateKind::ALL {
            let rules = rules_for(kind);
            let names: HashSet<&str> = rules.iter().map(|rule| rule.name).collect();
            assert_eq!(names.len(), rules.len(), "duplicate field in {kind} rules");
        }
    }

    #[test]
    fn test_every_rule_has_a_source() {
        for kind in CertificateKind::ALL {
            for rule in rules_for(kind) {
                assert!(!rule.sources.is_empty(), "{} has no sources", rule.name);
            }
        }
    }

    #[test]
    fn test_only_final_product_has_defaults() {
        let defaults: Vec<(&str, &str)> = rules_for(CertificateKind::FinalProduct)
            .iter()
            .filter(|rule| !rule.default.is_empty())
            .map(|rule| (rule.name, rule.default))
            .collect();
        assert_eq!(
            defaults,
            vec![("itemNo", "1"), ("reasonsForRejection", "Not Applicable")]
        );
        for kind in [CertificateKind::RawMaterial, CertificateKind::Process] {
            assert!(rules_for(kind).iter().all(|rule| rule.default.is_empty()));
        }
    }
}
