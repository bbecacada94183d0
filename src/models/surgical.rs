use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurgicalRecord {
    pub id: i64,
    pub patient_id: i64,
    pub surgery_date: NaiveDate,
    pub surgeon: Option<String>,
    pub procedures: SurgicalProcedures,
    pub notes: Option<String>,
}

/// Checkbox set of the surgical-history form, one column per procedure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SurgicalProcedures {
    pub hiatal_hernia: bool,
    pub paraesophageal_hernia: bool,
    pub mesh_used: bool,
    pub gastric_bypass: bool,
    pub sleeve_gastrectomy: bool,
    pub toupet: bool,
    pub tif: bool,
    pub nissen: bool,
    pub dor: bool,
    pub heller_myotomy: bool,
    pub stretta: bool,
    pub ablation: bool,
    pub linx: bool,
    pub gpoem: bool,
    pub epoem: bool,
    pub zpoem: bool,
    pub pyloroplasty: bool,
    pub revision: bool,
    pub gastric_stimulator: bool,
    pub dilation: bool,
    pub other: bool,
}

impl SurgicalProcedures {
    /// Display labels for the set flags, in form order.
    pub fn labels(&self) -> Vec<&'static str> {
        let all: [(bool, &'static str); 21] = [
            (self.hiatal_hernia, "Hiatal Hernia"),
            (self.paraesophageal_hernia, "Paraesophageal Hernia"),
            (self.mesh_used, "Mesh Used"),
            (self.gastric_bypass, "Gastric Bypass"),
            (self.sleeve_gastrectomy, "Sleeve Gastrectomy"),
            (self.toupet, "Toupet"),
            (self.tif, "TIF"),
            (self.nissen, "Nissen"),
            (self.dor, "Dor"),
            (self.heller_myotomy, "Heller Myotomy"),
            (self.stretta, "Stretta"),
            (self.ablation, "Ablation"),
            (self.linx, "LINX"),
            (self.gpoem, "G-POEM"),
            (self.epoem, "E-POEM"),
            (self.zpoem, "Z-POEM"),
            (self.pyloroplasty, "Pyloroplasty"),
            (self.revision, "Revision"),
            (self.gastric_stimulator, "Gastric Stimulator"),
            (self.dilation, "Dilation"),
            (self.other, "Other"),
        ];
        all.into_iter()
            .filter_map(|(set, label)| set.then_some(label))
            .collect()
    }
}
