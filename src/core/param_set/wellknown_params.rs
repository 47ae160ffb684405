const WELLKNOWN_PARAMS: [(&str, &str); 10] = [
    ("integer", "maxprimsinnode"),
    ("integer", "indices"),
    ("string", "filename"),
    ("string", "plugin"),
    ("string", "plugin-type"),
    ("string", "nontriangles"),
    ("string", "kernel"),
    ("bool", "symmetrize"),
    ("float", "radius"),
    ("point", "P"),
];

pub fn find_type_from_key(key: &str) -> Option<&str> {
    return WELLKNOWN_PARAMS
        .iter()
        .find(|(_t, k)| *k == key)
        .map(|(t, _k)| *t);
}
