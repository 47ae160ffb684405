use super::wellknown_params;
use crate::core::pbrt::types::*;
use crate::core::spectrum::*;
use std::collections::HashMap;

/// Typed, named parameters attached to a scene directive such as
/// `Accelerator "embree" "string nontriangles" "skip"`.
#[derive(Debug, Clone, Default)]
pub struct ParamSet {
    pub bools: HashMap<String, Vec<bool>>,
    pub ints: HashMap<String, Vec<i32>>,
    pub floats: HashMap<String, Vec<Float>>,
    pub strings: HashMap<String, Vec<String>>,
    pub spectrums: HashMap<String, Vec<Spectrum>>,
    pub points: HashMap<String, Vec<Float>>,
    pub keys: Vec<String>,
}

fn get_key_type(key: &str) -> String {
    let ss: Vec<&str> = key.split_ascii_whitespace().collect();
    match ss.len() {
        2 => {
            return String::from(ss[0]);
        }
        1 => {
            if let Some(t) = wellknown_params::find_type_from_key(ss[0]) {
                return String::from(t);
            }
        }
        _ => {}
    }
    return String::from("");
}

fn get_key_name(key: &str) -> String {
    let ss: Vec<&str> = key.split_ascii_whitespace().collect();
    match ss.len() {
        2 => String::from(ss[1]),
        _ => String::from(key),
    }
}

fn add_values<T: Clone>(
    k: &mut Vec<String>,
    m: &mut HashMap<String, Vec<T>>,
    key: &str,
    v: &[T],
) {
    k.push(key.to_string());
    // a repeated key replaces the earlier values
    m.insert(get_key_name(key), v.to_vec());
}

fn get_values_ref<'a, T>(m: &'a HashMap<String, Vec<T>>, key: &str) -> Option<&'a Vec<T>> {
    return m.get(&get_key_name(key)).filter(|v| !v.is_empty());
}

impl ParamSet {
    pub fn new() -> Self {
        Self::default()
    }

    //--------------------

    pub fn add_bool(&mut self, key: &str, v: bool) {
        add_values(&mut self.keys, &mut self.bools, key, &[v]);
    }

    pub fn add_int(&mut self, key: &str, v: i32) {
        add_values(&mut self.keys, &mut self.ints, key, &[v]);
    }

    pub fn add_ints(&mut self, key: &str, v: &[i32]) {
        add_values(&mut self.keys, &mut self.ints, key, v);
    }

    pub fn add_float(&mut self, key: &str, v: Float) {
        add_values(&mut self.keys, &mut self.floats, key, &[v]);
    }

    pub fn add_floats(&mut self, key: &str, v: &[Float]) {
        let t = get_key_type(key);
        match &t as &str {
            "point" | "point3" | "normal" | "vector" => {
                add_values(&mut self.keys, &mut self.points, key, v)
            }
            "color" | "rgb" => self.add_rgb(key, v),
            _ => add_values(&mut self.keys, &mut self.floats, key, v),
        }
    }

    pub fn add_string(&mut self, key: &str, v: &str) {
        add_values(&mut self.keys, &mut self.strings, key, &[String::from(v)]);
    }

    pub fn add_strings(&mut self, key: &str, v: &[&str]) {
        let v: Vec<String> = v.iter().map(|s| s.to_string()).collect();
        add_values(&mut self.keys, &mut self.strings, key, &v);
    }

    pub fn add_spectrum(&mut self, key: &str, v: &Spectrum) {
        add_values(&mut self.keys, &mut self.spectrums, key, &[*v]);
    }

    pub fn add_rgb(&mut self, key: &str, v: &[Float]) {
        let spectrums: Vec<Spectrum> = v
            .chunks_exact(3)
            .map(|c| Spectrum::new(c[0], c[1], c[2]))
            .collect();
        add_values(&mut self.keys, &mut self.spectrums, key, &spectrums);
    }

    pub fn add_point3f(&mut self, key: &str, v: &Point3f) {
        add_values(&mut self.keys, &mut self.points, key, &[v.x, v.y, v.z]);
    }

    pub fn add_point3fs(&mut self, key: &str, v: &[Point3f]) {
        let flat: Vec<Float> = v.iter().flat_map(|p| [p.x, p.y, p.z]).collect();
        add_values(&mut self.keys, &mut self.points, key, &flat);
    }

    //--------------------

    pub fn get_ints_ref(&self, key: &str) -> Option<&Vec<i32>> {
        return get_values_ref(&self.ints, key);
    }

    pub fn get_floats_ref(&self, key: &str) -> Option<&Vec<Float>> {
        return get_values_ref(&self.floats, key);
    }

    pub fn get_strings_ref(&self, key: &str) -> Option<&Vec<String>> {
        return get_values_ref(&self.strings, key);
    }

    pub fn get_points_ref(&self, key: &str) -> Option<&Vec<Float>> {
        return get_values_ref(&self.points, key);
    }

    //--------------------
    pub fn find_one_bool(&self, key: &str, value: bool) -> bool {
        match get_values_ref(&self.bools, key) {
            Some(v) => v[0],
            None => value,
        }
    }

    pub fn find_one_int(&self, key: &str, value: i32) -> i32 {
        match self.get_ints_ref(key) {
            Some(v) => v[0],
            None => value,
        }
    }

    pub fn find_one_float(&self, key: &str, value: Float) -> Float {
        match self.get_floats_ref(key) {
            Some(v) => v[0],
            None => value,
        }
    }

    pub fn find_one_string(&self, key: &str, value: &str) -> String {
        match self.get_strings_ref(key) {
            Some(v) => v[0].clone(),
            None => String::from(value),
        }
    }

    pub fn find_one_filename(&self, key: &str, value: &str) -> String {
        return self.find_one_string(key, value);
    }

    pub fn find_one_spectrum(&self, key: &str, value: &Spectrum) -> Spectrum {
        if let Some(r) = get_values_ref(&self.spectrums, key) {
            return r[0];
        }
        return *value;
    }

    pub fn find_one_point3f(&self, key: &str, value: &Point3f) -> Point3f {
        match self.get_points_ref(key) {
            Some(v) if v.len() >= 3 => Point3f::new(v[0], v[1], v[2]),
            _ => *value,
        }
    }

    /// Every complete xyz triple stored under `key`.
    pub fn find_point3fs(&self, key: &str) -> Vec<Point3f> {
        match self.get_points_ref(key) {
            Some(v) => v
                .chunks_exact(3)
                .map(|c| Point3f::new(c[0], c[1], c[2]))
                .collect(),
            None => Vec::new(),
        }
    }

    //--------------------

    pub fn replace_one_string(&mut self, key: &str, value: &str) {
        self.strings
            .insert(get_key_name(key), vec![String::from(value)]);
        if !self.keys.iter().any(|k| get_key_name(k) == get_key_name(key)) {
            self.keys.push(key.to_string());
        }
    }

    pub fn get_keys(&self) -> Vec<String> {
        return self.keys.clone();
    }

    pub fn get_key_name(&self, key: &str) -> String {
        return get_key_name(key);
    }

    pub fn get_key_type(&self, key: &str) -> String {
        return get_key_type(key);
    }
}
