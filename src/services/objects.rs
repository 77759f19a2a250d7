//! Object classification store
//!
//! Holds the classified shapes for one drawing session. Measurements come from
//! an external geometry service behind [`GeometryMeasurer`] and are refreshed
//! on every geometry change, so a stored object never carries stale numbers.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::{Geometry, GeometricObject, Measurements, ObjectSource, ObjectType};
use crate::error::EstimateResult;

/// Measures area, length or count for a geometry.
///
/// Implemented by the geometry service integration; the engine only calls it.
pub trait GeometryMeasurer {
    fn measure(&self, geometry: &Geometry) -> EstimateResult<Measurements>;
}

impl<F> GeometryMeasurer for F
where
    F: Fn(&Geometry) -> EstimateResult<Measurements>,
{
    fn measure(&self, geometry: &Geometry) -> EstimateResult<Measurements> {
        self(geometry)
    }
}

/// Request to classify a new shape
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifyObjectRequest {
    /// Generated when absent
    #[serde(default)]
    pub id: Option<String>,
    pub object_type: ObjectType,
    #[serde(default)]
    pub sub_type: Option<String>,
    pub geometry: Geometry,
    #[serde(default)]
    pub source: ObjectSource,
    #[serde(default)]
    pub confidence: Option<f64>,
}

/// Partial edit of a classified object
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateObjectRequest {
    #[serde(default)]
    pub object_type: Option<ObjectType>,
    /// `Some(None)` clears the sub-type
    #[serde(default)]
    pub sub_type: Option<Option<String>>,
    #[serde(default)]
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub source: Option<ObjectSource>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

pub struct ObjectStore<M> {
    measurer: M,
    objects: Vec<GeometricObject>,
}

impl<M: GeometryMeasurer> ObjectStore<M> {
    pub fn new(measurer: M) -> Self {
        Self {
            measurer,
            objects: Vec::new(),
        }
    }

    pub fn objects(&self) -> &[GeometricObject] {
        &self.objects
    }

    pub fn get(&self, id: &str) -> Option<&GeometricObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn of_type(&self, object_type: ObjectType) -> impl Iterator<Item = &GeometricObject> {
        self.objects
            .iter()
            .filter(move |o| o.object_type == object_type)
    }

    /// Classify a shape and return its id. An existing object with the same id
    /// is replaced in place.
    pub fn classify(&mut self, req: ClassifyObjectRequest) -> String {
        let id = req.id.unwrap_or_else(|| Uuid::new_v4().to_string());
        let measurements = self.measure(&id, &req.geometry);

        let object = GeometricObject {
            id: id.clone(),
            object_type: req.object_type,
            sub_type: req.sub_type,
            geometry: req.geometry,
            measurements,
            source: req.source,
            confidence: req.confidence,
        };

        match self.objects.iter_mut().find(|o| o.id == id) {
            Some(existing) => *existing = object,
            None => self.objects.push(object),
        }

        debug!(object_id = %id, "Object classified");
        id
    }

    /// Apply an edit. Returns `None` when no object has `id`.
    pub fn update(&mut self, id: &str, req: UpdateObjectRequest) -> Option<&GeometricObject> {
        let index = self.objects.iter().position(|o| o.id == id)?;

        if let Some(geometry) = req.geometry {
            let measurements = self.measure(id, &geometry);
            let object = &mut self.objects[index];
            object.geometry = geometry;
            object.measurements = measurements;
        }

        let object = &mut self.objects[index];
        if let Some(object_type) = req.object_type {
            object.object_type = object_type;
        }
        if let Some(sub_type) = req.sub_type {
            object.sub_type = sub_type;
        }
        if let Some(source) = req.source {
            object.source = source;
        }
        if let Some(confidence) = req.confidence {
            object.confidence = Some(confidence);
        }

        debug!(object_id = %id, "Object updated");
        Some(&self.objects[index])
    }

    pub fn remove(&mut self, id: &str) -> Option<GeometricObject> {
        let index = self.objects.iter().position(|o| o.id == id)?;
        debug!(object_id = %id, "Object removed");
        Some(self.objects.remove(index))
    }

    /// Unmeasurable geometry contributes nothing rather than failing the session.
    fn measure(&self, id: &str, geometry: &Geometry) -> Measurements {
        match self.measurer.measure(geometry) {
            Ok(measurements) => measurements,
            Err(e) => {
                warn!(object_id = %id, error = %e, "Geometry could not be measured, using zero measurements");
                Measurements::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EstimateError;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    /// Bounding-box stand-in for the geometry service.
    fn fake_measure(geometry: &Geometry) -> EstimateResult<Measurements> {
        match geometry {
            Geometry::Polygon { exterior, .. } if exterior.len() < 3 => {
                Err(EstimateError::measurement("degenerate polygon"))
            }
            Geometry::Polygon { exterior, .. } => {
                let xs = exterior.iter().map(|p| p[0]);
                let ys = exterior.iter().map(|p| p[1]);
                let w = xs.clone().fold(f64::MIN, f64::max) - xs.fold(f64::MAX, f64::min);
                let h = ys.clone().fold(f64::MIN, f64::max) - ys.fold(f64::MAX, f64::min);
                Ok(Measurements {
                    area: Decimal::from_f64_retain(w * h),
                    perimeter: Decimal::from_f64_retain(2.0 * (w + h)),
                    ..Default::default()
                })
            }
            Geometry::Point { .. } => Ok(Measurements {
                count: Some(Decimal::ONE),
                ..Default::default()
            }),
            _ => Ok(Measurements::default()),
        }
    }

    fn rect(w: f64, h: f64) -> Geometry {
        Geometry::Polygon {
            exterior: vec![[0.0, 0.0], [w, 0.0], [w, h], [0.0, h]],
            holes: vec![],
        }
    }

    fn pavement(id: &str, geometry: Geometry) -> ClassifyObjectRequest {
        ClassifyObjectRequest {
            id: Some(id.into()),
            object_type: ObjectType::Pavement,
            sub_type: Some("asphalt".into()),
            geometry,
            source: ObjectSource::Manual,
            confidence: None,
        }
    }

    #[test]
    fn test_classify_measures_geometry() {
        let mut store = ObjectStore::new(fake_measure);
        store.classify(pavement("lot-a", rect(100.0, 50.0)));

        let obj = store.get("lot-a").unwrap();
        assert_eq!(obj.measurements.area, Some(dec!(5000)));
        assert_eq!(obj.measurements.perimeter, Some(dec!(300)));
    }

    #[test]
    fn test_geometry_edit_remeasures() {
        let mut store = ObjectStore::new(fake_measure);
        store.classify(pavement("lot-a", rect(100.0, 50.0)));

        let updated = store
            .update(
                "lot-a",
                UpdateObjectRequest {
                    geometry: Some(rect(10.0, 10.0)),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.measurements.area, Some(dec!(100)));
        assert_eq!(updated.measurements.perimeter, Some(dec!(40)));
    }

    #[test]
    fn test_reclassify_keeps_measurements() {
        let mut store = ObjectStore::new(fake_measure);
        store.classify(pavement("lot-a", rect(20.0, 5.0)));

        let updated = store
            .update(
                "lot-a",
                UpdateObjectRequest {
                    object_type: Some(ObjectType::Concrete),
                    sub_type: Some(None),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.object_type, ObjectType::Concrete);
        assert_eq!(updated.sub_type, None);
        assert_eq!(updated.measurements.area, Some(dec!(100)));
    }

    #[test]
    fn test_unmeasurable_geometry_yields_zero_measurements() {
        let mut store = ObjectStore::new(fake_measure);
        let bad = Geometry::Polygon {
            exterior: vec![[0.0, 0.0], [1.0, 1.0]],
            holes: vec![],
        };
        store.classify(pavement("sliver", bad));

        assert_eq!(store.get("sliver").unwrap().measurements, Measurements::default());
    }

    #[test]
    fn test_classify_same_id_replaces() {
        let mut store = ObjectStore::new(fake_measure);
        store.classify(pavement("lot-a", rect(10.0, 10.0)));
        store.classify(pavement("lot-a", rect(20.0, 10.0)));

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("lot-a").unwrap().measurements.area, Some(dec!(200)));
    }

    #[test]
    fn test_remove_and_generated_ids() {
        let mut store = ObjectStore::new(fake_measure);
        let id = store.classify(ClassifyObjectRequest {
            id: None,
            object_type: ObjectType::ParkingStall,
            sub_type: None,
            geometry: Geometry::Point { position: [1.0, 2.0] },
            source: ObjectSource::AiDetected,
            confidence: Some(0.8),
        });

        assert_eq!(store.of_type(ObjectType::ParkingStall).count(), 1);
        assert!(store.remove(&id).is_some());
        assert!(store.remove(&id).is_none());
        assert!(store.is_empty());
        assert!(store.update(&id, UpdateObjectRequest::default()).is_none());
    }
}
