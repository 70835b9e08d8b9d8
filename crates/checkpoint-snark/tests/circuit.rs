use ark_bls12_377::g1::Parameters as G1Parameters;
use ark_bw6_761::Fr;
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystem, ConstraintSystemRef};
use checkpoint_crypto::{test_helpers::torsion_point, LimbLayout, CHECKPOINT_CONTEXT};
use checkpoint_gadgets::utils::test_helpers::{
    print_unsatisfied_constraints, run_profile_constraints,
};
use checkpoint_snark::{CircuitConfig, CommitteeSigCircuit};

use fixtures::generate_checkpoint;

fn synthesize(circuit: CommitteeSigCircuit) -> ConstraintSystemRef<Fr> {
    let cs = ConstraintSystem::<Fr>::new_ref();
    circuit.generate_constraints(cs.clone()).unwrap();
    cs
}

fn circuit(stakes: &[u64], bitmap: &[bool]) -> CommitteeSigCircuit {
    generate_checkpoint(stakes, bitmap)
        .to_circuit(&CHECKPOINT_CONTEXT)
        .unwrap()
}

#[test]
fn quorum_of_signers_is_satisfied() {
    run_profile_constraints(|| {
        let cs = synthesize(circuit(&[3334, 3333, 3333], &[true, false, true]));
        print_unsatisfied_constraints(cs.clone());
        assert!(cs.is_satisfied().unwrap());
    })
}

#[test]
fn single_signer_with_all_stake() {
    run_profile_constraints(|| {
        let cs = synthesize(circuit(&[10_000], &[true]));
        print_unsatisfied_constraints(cs.clone());
        assert!(cs.is_satisfied().unwrap());
    })
}

#[test]
fn minority_fails_with_correct_signature() {
    run_profile_constraints(|| {
        let cs = synthesize(circuit(&[3334, 3333, 3333], &[true, false, false]));
        assert!(!cs.is_satisfied().unwrap());
    })
}

#[test]
fn flipped_bit_fails() {
    run_profile_constraints(|| {
        // everyone signed, but the bitmap drops the last member: the stake still reaches a
        // quorum while the aggregate key no longer matches the signature
        let mut circuit = circuit(&[2500, 2500, 2500, 2500], &[true, true, true, true]);
        circuit.bitmap[3] = Some(Fr::from(0u64));
        circuit.signed_stake = Some(Fr::from(7500u64));
        let cs = synthesize(circuit);
        assert!(!cs.is_satisfied().unwrap());
    })
}

#[test]
fn overclaimed_stake_fails() {
    run_profile_constraints(|| {
        let mut circuit = circuit(&[3334, 3333, 3333], &[true, false, true]);
        circuit.signed_stake = Some(Fr::from(6668u64));
        let cs = synthesize(circuit);
        assert!(!cs.is_satisfied().unwrap());
    })
}

#[test]
fn reordered_committee_fails() {
    run_profile_constraints(|| {
        let mut circuit = circuit(&[4000, 3000, 3000], &[true, true, true]);
        circuit.public_keys.swap(1, 2);
        let cs = synthesize(circuit);
        assert!(!cs.is_satisfied().unwrap());
    })
}

#[test]
fn signature_with_torsion_component_fails() {
    run_profile_constraints(|| {
        let mut circuit = circuit(&[3334, 3333, 3333], &[true, true, true]);
        let signature = circuit.aggregated_signature.unwrap();
        circuit.aggregated_signature = Some(signature + torsion_point::<G1Parameters>());
        let cs = synthesize(circuit);
        assert!(!cs.is_satisfied().unwrap());
    })
}

#[test]
fn flag_of_two_fails() {
    run_profile_constraints(|| {
        let mut circuit = circuit(&[3334, 3333, 3333], &[true, true, false]);
        circuit.bitmap[2] = Some(Fr::from(2u64));
        let cs = synthesize(circuit);
        assert!(!cs.is_satisfied().unwrap());
    })
}

#[test]
fn padding_bits_in_limb_fail() {
    run_profile_constraints(|| {
        let mut circuit = circuit(&[10_000], &[true]);
        assert_eq!(circuit.config.layout, LimbLayout::Expanded512);
        // the head limb is 16 bits wide
        let head = circuit.message_limbs[0][0].unwrap();
        circuit.message_limbs[0][0] = Some(head + Fr::from(1u64 << 16));
        let cs = synthesize(circuit);
        assert!(!cs.is_satisfied().unwrap());
    })
}

#[test]
fn empty_committee_is_rejected() {
    let circuit = CommitteeSigCircuit::empty(CircuitConfig::new(0), &CHECKPOINT_CONTEXT);
    let cs = ConstraintSystem::<Fr>::new_ref();
    assert!(circuit.generate_constraints(cs).is_err());
}

#[test]
fn public_inputs_match_instance_assignment() {
    run_profile_constraints(|| {
        let checkpoint = generate_checkpoint(&[5000, 5000], &[true, true]);
        let public_inputs = checkpoint.public_inputs(&CHECKPOINT_CONTEXT).unwrap();
        let cs = synthesize(checkpoint.to_circuit(&CHECKPOINT_CONTEXT).unwrap());
        assert!(cs.is_satisfied().unwrap());

        let instance = cs.borrow().unwrap().instance_assignment.clone();
        // the first instance variable is the constant one
        assert_eq!(instance[0], Fr::from(1u64));
        assert_eq!(&instance[1..], &public_inputs[..]);
        assert_eq!(public_inputs.len(), checkpoint.config().num_public_inputs());
    })
}
