use rx_core::{
    Error, Heap, ITERATE_KEY, MAX_DENSE_LENGTH, PropKey, RefInstance, Symbol, Value, prop_map_new,
};

fn keys(names: &[&str]) -> Vec<PropKey> {
    names.iter().map(|n| PropKey::from(*n)).collect()
}

#[test]
fn canonical_index_strings_become_indices() {
    assert_eq!(PropKey::from("0"), PropKey::Index(0));
    assert_eq!(PropKey::from("42"), PropKey::from(42u32));
    assert!(!PropKey::from("01").is_index());
    assert!(!PropKey::from("-1").is_index());
    assert!(!PropKey::from("4294967295").is_index());
    assert!(PropKey::from("4294967294").is_index());
    assert!(PropKey::length().is_length());
}

#[test]
fn well_known_symbols_are_builtin_keys() {
    assert!(PropKey::from(Symbol::ITERATOR).is_builtin_symbol());
    assert!(!ITERATE_KEY.is_builtin_symbol());
    let mut heap = Heap::new();
    let user = heap.new_symbol();
    assert!(!PropKey::from(user).is_builtin_symbol());
    assert_ne!(heap.new_symbol(), user);
    assert_eq!(Symbol::ITERATOR.to_string(), "Symbol(Symbol.iterator)");
}

#[test]
fn own_keys_follow_enumeration_order() {
    let mut heap = Heap::new();
    let obj = heap.alloc_dict(prop_map_new());
    let sym = PropKey::from(heap.new_symbol());
    heap.define_own(obj, &sym, Value::from(0)).unwrap();
    heap.define_own(obj, &PropKey::from("b"), Value::from(1)).unwrap();
    heap.define_own(obj, &PropKey::from("2"), Value::from(2)).unwrap();
    heap.define_own(obj, &PropKey::from("a"), Value::from(3)).unwrap();
    heap.define_own(obj, &PropKey::from("1"), Value::from(4)).unwrap();

    let mut expected = vec![PropKey::Index(1), PropKey::Index(2)];
    expected.extend(keys(&["b", "a"]));
    expected.push(sym);
    assert_eq!(heap.own_keys(obj).unwrap(), expected);

    heap.delete_own(obj, &PropKey::from("b")).unwrap();
    heap.define_own(obj, &PropKey::from("b"), Value::from(5)).unwrap();
    assert_eq!(&heap.own_keys(obj).unwrap()[2..4], &keys(&["a", "b"])[..]);
}

#[test]
fn array_length_writes_truncate_and_pad() {
    let mut heap = Heap::new();
    let arr = heap.alloc_list(vec![Value::from(1), Value::from(2), Value::from(3)]);
    let length = PropKey::length();

    assert!(heap.define_own(arr, &length, Value::from(1)).unwrap());
    assert_eq!(heap.display(arr), "[1]");
    assert!(heap.define_own(arr, &length, Value::from_f64(3.0)).unwrap());
    assert_eq!(heap.display(arr), "[1,,]");
    assert!(!heap.has_own(arr, &PropKey::Index(2)).unwrap());
    assert!(heap.define_own(arr, &PropKey::Index(4), Value::from(5)).unwrap());
    assert_eq!(heap.get_own(arr, &length).unwrap(), Some(Value::from(5)));
    assert_eq!(
        heap.own_keys(arr).unwrap(),
        vec![PropKey::Index(0), PropKey::Index(4), PropKey::length()]
    );

    assert!(matches!(
        heap.define_own(arr, &length, Value::from_f64(1.5)),
        Err(Error::InvalidArrayLength(_))
    ));
    assert!(!heap.delete_own(arr, &length).unwrap());
}

#[test]
fn deleting_array_elements_leaves_holes() {
    let mut heap = Heap::new();
    let arr = heap.alloc_list(vec![Value::from(1), Value::from(2)]);
    let first = PropKey::Index(0);
    assert!(heap.delete_own(arr, &first).unwrap());
    assert_eq!(heap.display(arr), "[,2]");
    assert_eq!(heap.get_own(arr, &first).unwrap(), None);
    assert!(!heap.has_own(arr, &first).unwrap());
    assert_eq!(
        heap.get_own(arr, &PropKey::length()).unwrap(),
        Some(Value::from(2))
    );
    assert!(heap.delete_own(arr, &first).unwrap());
    assert!(heap.delete_own(arr, &PropKey::Index(9)).unwrap());
    assert_eq!(
        heap.own_keys(arr).unwrap(),
        vec![PropKey::Index(1), PropKey::length()]
    );

    assert!(heap.define_own(arr, &first, Value::UNDEFINED).unwrap());
    assert!(heap.has_own(arr, &first).unwrap());
    assert_eq!(heap.display(arr), "[undefined,2]");
}

#[test]
fn frozen_arrays_still_allow_deleting_holes() {
    let mut heap = Heap::new();
    let arr = heap.alloc_list(vec![Value::from(1)]);
    heap.define_own(arr, &PropKey::length(), Value::from(2)).unwrap();
    heap.freeze(arr).unwrap();
    assert!(heap.delete_own(arr, &PropKey::Index(1)).unwrap());
    assert!(!heap.delete_own(arr, &PropKey::Index(0)).unwrap());
}

#[test]
fn arrays_past_the_dense_limit_are_rejected() {
    let mut heap = Heap::new();
    let arr = heap.alloc_list(vec![Value::from(1)]);
    assert_eq!(
        heap.define_own(arr, &PropKey::Index(4_000_000_000), Value::from(1)),
        Err(Error::ArrayTooLong(4_000_000_001))
    );
    assert_eq!(
        heap.define_own(arr, &PropKey::length(), Value::from_f64(4e9)),
        Err(Error::ArrayTooLong(4_000_000_000))
    );
    assert!(matches!(
        heap.define_own(arr, &PropKey::length(), Value::from_f64(5e9)),
        Err(Error::InvalidArrayLength(_))
    ));
    assert_eq!(heap.display(arr), "[1]");

    assert!(matches!(
        heap.define_own(arr, &PropKey::from(MAX_DENSE_LENGTH), Value::TRUE),
        Err(Error::ArrayTooLong(_))
    ));
}

#[test]
fn frozen_objects_refuse_writes() {
    let mut heap = Heap::new();
    let obj = heap.alloc_dict(prop_map_new());
    heap.define_own(obj, &PropKey::from("a"), Value::from(1)).unwrap();
    heap.freeze(obj).unwrap();
    assert!(heap.is_frozen(obj));
    assert!(!heap.define_own(obj, &PropKey::from("a"), Value::from(2)).unwrap());
    assert!(!heap.delete_own(obj, &PropKey::from("a")).unwrap());
    assert!(heap.delete_own(obj, &PropKey::from("missing")).unwrap());
    assert_eq!(heap.get_own(obj, &PropKey::from("a")).unwrap(), Some(Value::from(1)));
}

#[test]
fn prototype_cycles_are_refused() {
    let mut heap = Heap::new();
    let a = heap.alloc_dict(prop_map_new());
    let b = heap.alloc_dict(prop_map_new());
    assert!(heap.set_prototype(b, Some(a)).unwrap());
    assert!(!heap.set_prototype(a, Some(b)).unwrap());
    assert!(!heap.set_prototype(a, Some(a)).unwrap());
    assert_eq!(heap.prototype_of(b).unwrap(), Some(a));
    assert_eq!(heap.prototype_of(a).unwrap(), None);
}

#[test]
fn refs_expose_their_slot_and_markers() {
    let mut heap = Heap::new();
    let r = heap.alloc_ref(RefInstance {
        raw: Value::from(1),
        value: Value::from(1),
        shallow: false,
    });
    assert_eq!(heap.get_own(r, &PropKey::value()).unwrap(), Some(Value::from(1)));
    assert_eq!(
        heap.get_own(r, &PropKey::from("__v_isRef")).unwrap(),
        Some(Value::TRUE)
    );
    assert!(!heap.delete_own(r, &PropKey::value()).unwrap());
    assert_eq!(heap.own_keys(r).unwrap(), keys(&["__v_isRef", "__v_isShallow", "value"]));
}

#[test]
fn operations_on_primitives_and_collected_objects_fail() {
    let mut heap = Heap::new();
    assert!(matches!(
        heap.get_own(Value::NULL, &PropKey::from("a")),
        Err(Error::NotAnObject { found: "null", .. })
    ));
    let s = heap.alloc_str("text");
    assert!(matches!(
        heap.define_own(s, &PropKey::from("a"), Value::TRUE),
        Err(Error::NotAnObject { found: "string", .. })
    ));

    let obj = heap.alloc_dict(prop_map_new());
    heap.start_marking();
    assert_eq!(heap.sweep(), 2);
    assert_eq!(
        heap.get_own(obj, &PropKey::from("a")),
        Err(Error::Collected(obj.as_obj_id()))
    );
}

#[test]
fn sweep_keeps_everything_reachable_from_roots() {
    let mut heap = Heap::new();
    let leaf = heap.alloc_str("leaf");
    let list = heap.alloc_list(vec![leaf]);
    let mut props = prop_map_new();
    props.insert(PropKey::from("list"), list);
    let root = heap.alloc_dict(props);
    let orphan = heap.alloc_list(vec![]);

    heap.start_marking();
    heap.mark_from(&[root]);
    assert_eq!(heap.sweep(), 1);
    assert!(!heap.contains(orphan.as_obj_id()));
    assert_eq!(heap.str_of(leaf), Some("leaf"));
    assert_eq!(heap.live_count(), 3);

    let reused = heap.alloc_list(vec![]);
    assert_eq!(reused.as_obj_id(), orphan.as_obj_id());
}

#[test]
fn display_handles_cycles() {
    let mut heap = Heap::new();
    let obj = heap.alloc_dict(prop_map_new());
    heap.define_own(obj, &PropKey::from("me"), obj).unwrap();
    let name = heap.alloc_str("x");
    heap.define_own(obj, &PropKey::from("name"), name).unwrap();
    assert_eq!(heap.display(obj), "{me: {...}, name: \"x\"}");
}

#[test]
fn property_keys_from_values() {
    let mut heap = Heap::new();
    let s = heap.alloc_str("7");
    assert_eq!(heap.to_prop_key(s).unwrap(), PropKey::Index(7));
    assert_eq!(heap.to_prop_key(Value::from(3)).unwrap(), PropKey::Index(3));
    assert_eq!(heap.to_prop_key(Value::from(-1)).unwrap(), PropKey::from("-1"));
    assert_eq!(heap.to_prop_key(Value::from_f64(1.5)).unwrap(), PropKey::from("1.5"));
    assert_eq!(heap.to_prop_key(Value::TRUE).unwrap(), PropKey::from("true"));
    let list = heap.alloc_list(vec![]);
    assert_eq!(heap.to_prop_key(list), Err(Error::InvalidKey("array")));
}
